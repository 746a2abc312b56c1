//! Helpers for tests across the workspace: an in-memory store with the
//! schema applied and uploaders that never leave the process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;

use crate::listing::{ImagePolicy, ListingService, SeaOrmListingRepository};
use crate::media::{MediaError, MediaFile, MediaUploader};

/// Fresh `sqlite::memory:` database with migrations applied.
pub async fn memory_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Service over a fresh in-memory store and a recording uploader.
pub async fn listing_service(
    policy: ImagePolicy,
) -> Result<(Arc<ListingService>, Arc<RecordingUploader>, DatabaseConnection), anyhow::Error> {
    let db = memory_db().await?;
    let uploads = Arc::new(RecordingUploader::default());
    let repo = Arc::new(SeaOrmListingRepository::new(db.clone()));
    let svc = Arc::new(ListingService::new(repo, uploads.clone(), policy));
    Ok((svc, uploads, db))
}

pub fn png(file_name: &str) -> MediaFile {
    MediaFile {
        file_name: Some(file_name.to_string()),
        content_type: Some("image/png".into()),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

/// Accepts every file and hands out unique `https://media.test/...` URLs.
#[derive(Default)]
pub struct RecordingUploader {
    seq: AtomicUsize,
    received: Mutex<Vec<MediaFile>>,
}

impl RecordingUploader {
    pub fn uploads(&self) -> Vec<MediaFile> {
        self.received.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaUploader for RecordingUploader {
    async fn upload(&self, file: MediaFile) -> Result<String, MediaError> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let name = file.file_name.clone().unwrap_or_else(|| "upload".into());
        if let Ok(mut received) = self.received.lock() {
            received.push(file);
        }
        Ok(format!("https://media.test/listings/{n}/{name}"))
    }
}

/// Rejects every upload, like a media host with bad credentials.
pub struct FailingUploader;

#[async_trait]
impl MediaUploader for FailingUploader {
    async fn upload(&self, _file: MediaFile) -> Result<String, MediaError> {
        Err(MediaError::Rejected { status: 401, message: "Invalid Signature".into() })
    }
}
