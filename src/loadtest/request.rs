use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use url::Url;

use crate::sampling::{BoundingBox, TimeInterval};

pub const SEARCH_METHOD: &str = "POST";
pub const SEARCH_NAME: &str = "/search";

/// Body of a STAC item search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub bbox: BoundingBox,
    pub datetime: TimeInterval,
    pub limit: u32,
}

/// Outcome of one search request as seen by the statistics collector.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub method: &'static str,
    pub name: &'static str,
    pub response_time: Duration,
    pub content_length: u64,
    /// Failure message; `None` for a successful request.
    pub error: Option<String>,
}

impl RequestRecord {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// A search succeeds on status 200 with a top-level `features` member.
#[must_use]
pub fn check_response(status: StatusCode, body: &[u8]) -> Option<String> {
    if status != StatusCode::OK {
        return Some(format!("Status code {}", status.as_u16()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if map.contains_key("features") => None,
        Ok(_) => Some("Missing 'features' in response".to_owned()),
        Err(err) => Some(format!("Invalid JSON in response: {}", err)),
    }
}

/// POSTs `request` to `url`, timing until the full body has been read.
pub async fn execute_search(client: &Client, url: &Url, request: &SearchRequest) -> RequestRecord {
    let started = Instant::now();
    let record = |content_length: u64, error: Option<String>| RequestRecord {
        method: SEARCH_METHOD,
        name: SEARCH_NAME,
        response_time: started.elapsed(),
        content_length,
        error,
    };

    let response = match client.post(url.clone()).json(request).send().await {
        Ok(response) => response,
        Err(err) => return record(0, Some(err.to_string())),
    };
    let status = response.status();
    match response.bytes().await {
        Ok(body) => {
            let content_length = u64::try_from(body.len()).unwrap_or(u64::MAX);
            record(content_length, check_response(status, &body))
        }
        Err(err) => record(0, Some(err.to_string())),
    }
}
