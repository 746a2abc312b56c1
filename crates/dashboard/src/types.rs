use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

/// Longest `about` text the form accepts.
pub const ABOUT_MAX_CHARS: usize = 400;

/// A listing as the API returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub about: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Text fields of the modal form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub name: String,
    pub about: String,
}

impl ListingDraft {
    pub fn from_listing(listing: &Listing) -> Self {
        Self { name: listing.name.clone(), about: listing.about.clone() }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.name.trim().is_empty() {
            return Err(DashboardError::Validation("Please enter a name".into()));
        }
        if self.about.trim().is_empty() {
            return Err(DashboardError::Validation("Please enter a description".into()));
        }
        if self.about.chars().count() > ABOUT_MAX_CHARS {
            return Err(DashboardError::Validation(format!("about must be at most {ABOUT_MAX_CHARS} characters")));
        }
        Ok(())
    }
}

/// An image file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = content_type_for(path).to_string();
        Ok(Self { file_name, content_type, bytes })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
