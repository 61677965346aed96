use std::time::Duration;

use reqwest::{Client, Response};
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

/// Timeout for establishing a new connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the client shared by every request of a command.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(request_timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

/// Appends `path` to `base`, keeping any path prefix of the base URL.
///
/// # Errors
///
/// Returns an error when the base URL cannot be parsed.
pub fn join_url(base: &str, path: &str) -> AppResult<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|err| {
        AppError::http(HttpError::JoinUrlFailed {
            url: base.to_owned(),
            path: path.to_owned(),
            source: err,
        })
    })
}

/// Turns a non-2xx response into [`HttpError::UnexpectedStatus`] carrying the body.
///
/// # Errors
///
/// Returns an error when the status is not a success.
pub async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|err| format!("<unreadable body: {}>", err));
    Err(AppError::http(HttpError::UnexpectedStatus {
        url,
        status: status.as_u16(),
        body,
    }))
}
