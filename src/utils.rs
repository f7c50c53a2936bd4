//! Small helpers shared by the pipeline stages.
//!
//! - Log-friendly string truncation
//! - Output directory validation

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut at a character boundary and
/// get `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory (and its parents) if needed, then writes and removes
/// a probe file. A probe that cannot be removed is logged, not fatal.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    // create_dir_all succeeds on read-only dirs that already exist
    let probe_path = path.join("..__probe_write__");
    fs::File::create(&probe_path).await?;
    if let Err(e) = fs::remove_file(&probe_path).await {
        warn!(path = %probe_path.display(), error = %e, "Failed to remove write probe");
    }
    info!("Directory is writable");
    Ok(())
}
