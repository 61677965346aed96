use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to join URL '{url}' with '{path}': {source}")]
    JoinUrlFailed {
        url: String,
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned status {status}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Failed to decode response from {url}: {source}")]
    DecodeResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Response from {url} is missing '{field}'.")]
    MissingField { url: String, field: &'static str },
    #[error("Invalid campaign '{campaign}': {reason}")]
    InvalidCampaign { campaign: String, reason: String },
}
