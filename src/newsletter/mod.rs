//! Campaign statistics from the Brevo API, summed over distribution lists
//! and written as a CSV table.
mod aggregate;
mod client;
mod output;
mod types;


use tracing::info;

use crate::args::NewsletterArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::build_client;

pub use aggregate::{aggregate_stats, build_rows, format_sent_date};
pub use client::{CampaignQuery, fetch_campaigns};
pub use output::{render_csv, stat_columns, validate_csv_path, write_campaign_csv};
pub use types::{Campaign, CampaignRow, CampaignStatistics, CampaignsResponse, StatValue};

/// Fetches the latest campaigns and writes their summed statistics.
///
/// # Errors
///
/// Returns an error for a non-CSV output path, a missing API key, a failed
/// request, or a failed write.
pub async fn export_campaign_stats(args: &NewsletterArgs) -> AppResult<()> {
    validate_csv_path(&args.csv)?;
    let api_key = args.api_key.as_deref().ok_or_else(|| {
        AppError::validation(ValidationError::MissingCredential {
            what: "Brevo API key",
            flag: "--api-key",
            env: "BREVO_API_KEY",
        })
    })?;

    let client = build_client(args.request_timeout)?;
    let query = CampaignQuery {
        limit: args.limit,
        exclude_html: !args.include_html,
    };
    let campaigns = fetch_campaigns(&client, &args.api_url, api_key, query).await?;
    let rows = build_rows(&campaigns)?;
    write_campaign_csv(&rows, &args.csv).await?;
    info!(
        "Wrote {} campaign(s) to {}",
        rows.len(),
        args.csv.display()
    );
    Ok(())
}
