use chrono::{DateTime, Timelike};
use tracing::debug;

use crate::error::{AppError, AppResult, HttpError};

use super::types::{Campaign, CampaignRow, StatValue};

/// Per-list key that is dropped before summing.
const LIST_ID_KEY: &str = "listId";

/// Sums the per-list statistics of a campaign.
///
/// Keys keep their first-seen order. A key absent from any list, or holding a
/// non-numeric value, yields `None`.
#[must_use]
pub fn aggregate_stats(campaign: &Campaign) -> Vec<(String, Option<StatValue>)> {
    let lists = &campaign.statistics.campaign_stats;
    let mut keys: Vec<&str> = Vec::new();
    for list in lists {
        for key in list.keys() {
            if key != LIST_ID_KEY && !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }

    keys.into_iter()
        .map(|key| {
            let total = lists.iter().try_fold(None, |acc: Option<StatValue>, list| {
                let value = list.get(key).and_then(StatValue::from_json)?;
                Some(Some(acc.map_or(value, |sum| sum.add(value))))
            });
            if total.is_none() {
                debug!(
                    "Statistic '{}' of campaign '{}' is missing in a list",
                    key, campaign.name
                );
            }
            (key.to_owned(), total.flatten())
        })
        .collect()
}

/// Renders `sentDate` the way a timezone-aware timestamp prints:
/// `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`.
///
/// # Errors
///
/// Returns an error when the date is not RFC 3339.
pub fn format_sent_date(campaign: &Campaign) -> AppResult<Option<String>> {
    let Some(raw) = campaign.sent_date.as_deref() else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|err| {
        AppError::http(HttpError::InvalidCampaign {
            campaign: campaign.name.clone(),
            reason: format!("invalid sentDate '{}': {}", raw, err),
        })
    })?;
    let pattern = if parsed.nanosecond() == 0 {
        "%Y-%m-%d %H:%M:%S%:z"
    } else {
        "%Y-%m-%d %H:%M:%S%.6f%:z"
    };
    Ok(Some(parsed.format(pattern).to_string()))
}

/// Builds one output row per campaign.
///
/// # Errors
///
/// Returns an error when a campaign carries an invalid `sentDate`.
pub fn build_rows(campaigns: &[Campaign]) -> AppResult<Vec<CampaignRow>> {
    campaigns
        .iter()
        .map(|campaign| {
            Ok(CampaignRow {
                campaign: campaign.name.clone(),
                campaign_brevo_id: campaign.id,
                sent_date: format_sent_date(campaign)?,
                stats: aggregate_stats(campaign),
            })
        })
        .collect()
}
