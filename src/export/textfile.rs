use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, AppResult, ExportError};

use super::exposition::{collect_families, render_families};
use super::stats::StatsRow;

/// Writes all rows into one metrics file.
///
/// The content goes to `<path>.tmp` first and is renamed into place, so a
/// collector never reads a partial file.
///
/// # Errors
///
/// Returns an error when rendering or writing fails.
pub async fn write_textfile(
    path: &Path,
    job_prefix: &str,
    rows: &[StatsRow],
) -> AppResult<()> {
    let families = collect_families(rows, Some(job_prefix));
    let content = render_families(&families)?;

    let tmp_path = temporary_path(path);
    let write_error = |target: &Path, err: std::io::Error| {
        AppError::export(ExportError::WriteMetrics {
            path: target.to_path_buf(),
            source: err,
        })
    };
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(|err| write_error(&tmp_path, err))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|err| write_error(path, err))?;
    info!(
        "Wrote {} metric families to {}",
        families.len(),
        path.display()
    );
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}
