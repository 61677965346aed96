use reqwest::Client;
use tracing::info;

use crate::error::{AppError, AppResult, HttpError};
use crate::http::{ensure_success, join_url};

use super::types::{Campaign, CampaignsResponse};

/// Query options of the `emailCampaigns` listing.
#[derive(Debug, Clone, Copy)]
pub struct CampaignQuery {
    pub limit: u32,
    pub exclude_html: bool,
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            exclude_html: true,
        }
    }
}

/// Fetches the most recent campaigns, newest first.
///
/// # Errors
///
/// Returns an error when the request fails, the API answers with a non-2xx
/// status, or the body is not a campaign listing.
pub async fn fetch_campaigns(
    client: &Client,
    api_url: &str,
    api_key: &str,
    query: CampaignQuery,
) -> AppResult<Vec<Campaign>> {
    let mut url = join_url(api_url, "emailCampaigns")?;
    url.query_pairs_mut()
        .append_pair("limit", &query.limit.to_string())
        .append_pair("offset", "0")
        .append_pair("sort", "desc")
        .append_pair("excludeHtmlContent", &query.exclude_html.to_string());
    info!("Request stats: {}", url);

    let response = client
        .get(url.clone())
        .header("accept", "application/json")
        .header("api-key", api_key)
        .send()
        .await
        .map_err(|err| {
            AppError::http(HttpError::RequestFailed {
                url: url.to_string(),
                source: err,
            })
        })?;
    let response = ensure_success(response).await?;
    let listing: CampaignsResponse = response.json().await.map_err(|err| {
        AppError::http(HttpError::DecodeResponse {
            url: url.to_string(),
            source: err,
        })
    })?;
    info!("Fetched {} campaign(s)", listing.campaigns.len());
    Ok(listing.campaigns)
}
