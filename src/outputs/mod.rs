//! Export of the collected article records.
//!
//! # Submodules
//!
//! - [`xlsx`]: the spreadsheet every run produces
//! - [`json`]: an optional JSON copy of the same rows
//!
//! Both writers create missing parent directories and overwrite existing
//! files. Any failure here is fatal for the run.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod json;
pub mod xlsx;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create the directory that will hold `path`, if it has one.
fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
