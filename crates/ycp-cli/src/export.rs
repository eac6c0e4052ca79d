//! Saving a finished analysis to disk

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

use ycp_core::Result;

/// `yc-pilot-analysis-YYYY-MM-DD.txt`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("yc-pilot-analysis-{}.txt", date.format("%Y-%m-%d"))
}

/// Write the response text into `dir`, named after today's date.
/// An existing file for the same day is overwritten.
pub async fn save_report(dir: &Path, text: &str) -> Result<PathBuf> {
    let path = dir.join(report_file_name(Local::now().date_naive()));
    tokio::fs::write(&path, text).await?;
    info!(path = %path.display(), "saved analysis");
    Ok(path)
}
