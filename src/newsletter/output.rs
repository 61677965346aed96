use std::path::Path;

use crate::error::{AppError, AppResult, ExportError, ValidationError};

use super::types::CampaignRow;

const CAMPAIGN_COLUMNS: [&str; 3] = ["campaign", "campaign_brevo_id", "sent_date"];

/// Output files must carry a `.csv` name.
///
/// # Errors
///
/// Returns an error for any other file name.
pub fn validate_csv_path(path: &Path) -> AppResult<()> {
    let is_csv = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".csv"));
    if !is_csv {
        return Err(AppError::validation(ValidationError::UnsupportedCsvPath {
            path: path.display().to_string(),
        }));
    }
    Ok(())
}

/// Statistic columns across all rows in first-seen order.
#[must_use]
pub fn stat_columns(rows: &[CampaignRow]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for (key, _) in &row.stats {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    columns
}

/// Serializes rows to CSV; cells without a value stay empty.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_csv(rows: &[CampaignRow], path: &Path) -> AppResult<Vec<u8>> {
    let csv_error = |err: csv::Error| {
        AppError::export(ExportError::WriteCsv {
            path: path.to_path_buf(),
            source: err,
        })
    };
    let stats = stat_columns(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = CAMPAIGN_COLUMNS.iter().copied().chain(stats.iter().copied());
    writer.write_record(header).map_err(csv_error)?;

    for row in rows {
        let mut record = vec![
            row.campaign.clone(),
            row.campaign_brevo_id.to_string(),
            row.sent_date.clone().unwrap_or_default(),
        ];
        for column in &stats {
            let cell = row
                .stats
                .iter()
                .find(|(key, _)| key == column)
                .and_then(|(_, value)| value.map(|value| value.render()))
                .unwrap_or_default();
            record.push(cell);
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.into_inner().map_err(|err| {
        AppError::export(ExportError::FlushCsv {
            path: path.to_path_buf(),
            source: err.into_error(),
        })
    })
}

/// Writes the campaign table to `path`.
///
/// # Errors
///
/// Returns an error if rendering or writing the file fails.
pub async fn write_campaign_csv(rows: &[CampaignRow], path: &Path) -> AppResult<()> {
    let content = render_csv(rows, path)?;
    tokio::fs::write(path, content).await.map_err(|err| {
        AppError::export(ExportError::WriteMetrics {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
