//! Replaces one file of a GitHub gist with the content of a local CSV file.

use std::path::Path;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::args::GistArgs;
use crate::error::{AppError, AppResult, ExportError, HttpError, ValidationError};
use crate::http::{build_client, join_url};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Body of the gist update: `{"files": {"<filename>": {"content": "..."}}}`.
#[must_use]
pub fn build_payload(filename: &str, content: &str) -> Value {
    let mut files = serde_json::Map::new();
    files.insert(filename.to_owned(), json!({ "content": content }));
    json!({ "files": files })
}

/// PATCHes `<api_url>/gists/<gist_id>` with the given file content.
///
/// # Errors
///
/// Returns an error when the request fails or GitHub answers with a
/// non-success status. The response body is logged in that case.
pub async fn upload_gist(
    client: &Client,
    api_url: &str,
    gist_id: &str,
    token: &str,
    filename: &str,
    content: &str,
) -> AppResult<()> {
    let url = join_url(api_url, &format!("gists/{}", gist_id))?;
    let response = client
        .patch(url.clone())
        .header(AUTHORIZATION, format!("token {}", token))
        .header(ACCEPT, GITHUB_ACCEPT)
        .header(GITHUB_API_VERSION_HEADER, GITHUB_API_VERSION)
        .json(&build_payload(filename, content))
        .send()
        .await
        .map_err(|err| {
            AppError::http(HttpError::RequestFailed {
                url: url.to_string(),
                source: err,
            })
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<unreadable body: {}>", err));
        error!("Error uploading to gist {}: {}", gist_id, body);
        return Err(AppError::http(HttpError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        }));
    }
    info!("Gist {} updated ({})", gist_id, filename);
    Ok(())
}

async fn read_csv(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|err| {
        AppError::export(ExportError::ReadFile {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

/// Uploads `args.csv` into the configured gist.
///
/// # Errors
///
/// Returns an error for a missing token, an unreadable file, or a failed
/// upload.
pub async fn upload_csv(args: &GistArgs) -> AppResult<()> {
    let token = args.token.as_deref().ok_or_else(|| {
        AppError::validation(ValidationError::MissingCredential {
            what: "GitHub token",
            flag: "--token",
            env: "GITHUB_TOKEN",
        })
    })?;
    let content = read_csv(&args.csv).await?;
    let client = build_client(args.request_timeout)?;
    upload_gist(
        &client,
        &args.api_url,
        &args.gist_id,
        token,
        &args.filename,
        &content,
    )
    .await
}
