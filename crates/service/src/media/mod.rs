//! Image upload collaborator. Takes the raw file and hands back a durable URL.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub mod cloudinary;

pub use cloudinary::CloudinaryUploader;

/// A file received from a form submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Browsers submit an empty, unnamed part when no file was chosen.
    pub fn is_placeholder(&self) -> bool {
        self.bytes.is_empty() && self.file_name.as_deref().map(str::is_empty).unwrap_or(true)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media upload is not configured")]
    NotConfigured,
    #[error("invalid file: {0}")]
    InvalidFile(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid upload response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload `file` and return the public URL it is served from.
    async fn upload(&self, file: MediaFile) -> Result<String, MediaError>;
}

/// Used when no credentials are configured; listings without images keep working.
pub struct UnconfiguredUploader;

#[async_trait]
impl MediaUploader for UnconfiguredUploader {
    async fn upload(&self, _file: MediaFile) -> Result<String, MediaError> {
        Err(MediaError::NotConfigured)
    }
}

pub fn from_config(cfg: &configs::MediaConfig) -> Arc<dyn MediaUploader> {
    match cfg.credentials() {
        Some((cloud_name, api_key, api_secret)) => {
            Arc::new(CloudinaryUploader::new(&cfg.base_url, cloud_name, api_key, api_secret))
        }
        None => {
            warn!("cloudinary credentials missing; image uploads will fail");
            Arc::new(UnconfiguredUploader)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_unnamed_part_is_placeholder() {
        assert!(MediaFile::default().is_placeholder());
        let named = MediaFile { file_name: Some("a.png".into()), ..Default::default() };
        assert!(!named.is_placeholder());
        let with_bytes = MediaFile { bytes: vec![1, 2, 3], ..Default::default() };
        assert!(!with_bytes.is_placeholder());
    }

    #[tokio::test]
    async fn unconfigured_uploader_fails() {
        let cfg = configs::MediaConfig::default();
        let uploader = from_config(&cfg);
        let err = uploader.upload(MediaFile::default()).await.unwrap_err();
        assert!(matches!(err, MediaError::NotConfigured));
    }
}
