//! Image download and content-addressed storage.
//!
//! Every image is stored as `<folder>/<sha256-hex>.jpg`, so the file name is
//! a pure function of the downloaded bytes: articles sharing an image share a
//! single file, and storing the same bytes twice rewrites identical content.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("request failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of image bytes.
pub trait ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError>;
}

/// Downloads images over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpImageFetcher { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MediaError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }
}

/// Serves fixed bytes per URL; unknown URLs answer 404.
#[cfg(test)]
pub struct StaticImages(pub std::collections::HashMap<String, Vec<u8>>);

#[cfg(test)]
impl ImageFetcher for StaticImages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        self.0.get(url).cloned().ok_or_else(|| MediaError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Where `bytes` are stored inside `folder`.
pub fn image_path(folder: &Path, bytes: &[u8]) -> PathBuf {
    folder.join(format!("{}.jpg", content_hash(bytes)))
}

/// Write `bytes` under their content-addressed name, replacing any existing
/// file of that name.
pub async fn store_image(folder: &Path, bytes: &[u8]) -> Result<PathBuf, MediaError> {
    let path = image_path(folder, bytes);
    fs::write(&path, bytes)
        .await
        .map_err(|source| MediaError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
