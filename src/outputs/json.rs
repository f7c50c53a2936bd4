//! JSON output of the result set.
//!
//! Writes the records as a pretty-printed array of objects whose keys match
//! the spreadsheet columns.

use super::{ExportError, ensure_parent};
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `records` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub async fn write_results(records: &[ArticleRecord], path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(records)?;
    ensure_parent(path)?;

    fs::write(path, json)
        .await
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote JSON results");
    Ok(())
}
