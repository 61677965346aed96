use base64::{Engine as _, engine::general_purpose::URL_SAFE as B64};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

use crate::error::{AppError, AppResult, HttpError};
use crate::http::ensure_success;

use super::exposition::{collect_families, job_name, render_families};
use super::stats::StatsRow;

/// Content type of the text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Basic auth credentials for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayAuth {
    pub user: String,
    pub password: Option<String>,
}

/// Builds `<gateway>/metrics/job/<job>`.
///
/// Job values that are empty or contain `/` use the `job@base64` form.
///
/// # Errors
///
/// Returns an error when the gateway URL cannot carry a path.
pub fn grouping_url(gateway: &str, job: &str) -> AppResult<Url> {
    let invalid = |source: url::ParseError| {
        AppError::http(HttpError::JoinUrlFailed {
            url: gateway.to_owned(),
            path: format!("metrics/job/{}", job),
            source,
        })
    };
    let mut url = Url::parse(gateway).map_err(invalid)?;
    let (key, value) = if job.is_empty() || job.contains('/') {
        ("job@base64".to_owned(), encode_base64(job))
    } else {
        ("job".to_owned(), job.to_owned())
    };
    url.path_segments_mut()
        .map_err(|()| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(["metrics", key.as_str(), value.as_str()]);
    Ok(url)
}

fn encode_base64(value: &str) -> String {
    if value.is_empty() {
        return "=".to_owned();
    }
    B64.encode(value)
}

/// Pushes one job per non-aggregated row, replacing the job's previous metrics.
///
/// Returns the number of pushed jobs.
///
/// # Errors
///
/// Returns an error on the first failed push.
pub async fn push_stats(
    client: &Client,
    gateway: &str,
    auth: Option<&GatewayAuth>,
    job_prefix: &str,
    rows: &[StatsRow],
) -> AppResult<usize> {
    let mut pushed = 0usize;
    for row in rows.iter().filter(|row| !row.is_aggregated()) {
        let families = collect_families(std::slice::from_ref(row), None);
        let body = render_families(&families)?;
        let job = job_name(job_prefix, row);
        let url = grouping_url(gateway, &job)?;
        debug!("Pushing {} metrics for job {} to {}", families.len(), job, url);

        let mut request = client
            .put(url.clone())
            .header(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)
            .body(body);
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.user, auth.password.as_deref());
        }
        let response = request.send().await.map_err(|err| {
            AppError::http(HttpError::RequestFailed {
                url: url.to_string(),
                source: err,
            })
        })?;
        ensure_success(response).await?;
        pushed = pushed.saturating_add(1);
    }
    info!("Pushed {} job(s) to {}", pushed, gateway);
    Ok(pushed)
}
