use std::sync::Arc;

use models::listing::{self, ImageChange, ListingChanges};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::listing::parse_id;
use crate::listing::repository::{ListingRepository, NewListing};
use crate::media::{MediaFile, MediaUploader};

/// What an update without a new image file does to the stored image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImagePolicy {
    /// The stored image is dropped. Matches the long-standing API contract.
    #[default]
    ClearWithoutUpload,
    /// The stored image is left as it is.
    PreserveWithoutUpload,
}

impl ImagePolicy {
    pub fn from_config(cfg: &configs::ListingsConfig) -> Self {
        if cfg.preserve_image_on_update { Self::PreserveWithoutUpload } else { Self::ClearWithoutUpload }
    }

    fn without_upload(self) -> ImageChange {
        match self {
            Self::ClearWithoutUpload => ImageChange::Clear,
            Self::PreserveWithoutUpload => ImageChange::Keep,
        }
    }
}

/// Parsed create submission. Text fields are optional here so that presence
/// is checked in one place.
#[derive(Clone, Debug, Default)]
pub struct CreateListing {
    pub name: Option<String>,
    pub about: Option<String>,
    pub image: Option<MediaFile>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateListing {
    pub id: Option<String>,
    pub name: Option<String>,
    pub about: Option<String>,
    pub image: Option<MediaFile>,
}

/// Listing operations: validate, upload the image if one came with the
/// request, then write through the repository.
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
    media: Arc<dyn MediaUploader>,
    image_policy: ImagePolicy,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>, media: Arc<dyn MediaUploader>, image_policy: ImagePolicy) -> Self {
        Self { repo, media, image_policy }
    }

    pub fn image_policy(&self) -> ImagePolicy { self.image_policy }

    pub async fn list(&self) -> Result<Vec<listing::Model>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self, input), fields(has_image = input.image.is_some()))]
    pub async fn create(&self, input: CreateListing) -> Result<listing::Model, ServiceError> {
        let name = input.name.unwrap_or_default();
        let about = input.about.unwrap_or_default();
        listing::validate_required("name", &name)?;
        listing::validate_required("about", &about)?;

        let image = self.upload(input.image).await?;
        let created = self.repo.create(NewListing { name, about, image }).await?;
        info!(id = %created.id, has_image = created.image.is_some(), "created listing");
        Ok(created)
    }

    #[instrument(skip(self, input), fields(id = ?input.id, has_image = input.image.is_some()))]
    pub async fn update(&self, input: UpdateListing) -> Result<listing::Model, ServiceError> {
        let id = parse_id(input.id.as_deref(), "updating")?;
        let name = input.name.filter(|s| !s.is_empty());
        let about = input.about.filter(|s| !s.is_empty());
        if let Some(name) = &name {
            listing::validate_required("name", name)?;
        }
        if let Some(about) = &about {
            listing::validate_required("about", about)?;
        }
        if self.repo.find(id).await?.is_none() {
            return Err(ServiceError::not_found("Listing"));
        }

        let image = match self.upload(input.image).await? {
            Some(url) => ImageChange::Replace(url),
            None => self.image_policy.without_upload(),
        };
        let changes = ListingChanges { name, about, image };

        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Listing"))?;
        info!(id = %updated.id, has_image = updated.image.is_some(), "updated listing");
        Ok(updated)
    }

    /// Delete without an existence check; deleting an unknown id succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Option<&str>) -> Result<(), ServiceError> {
        let id = parse_id(id, "deleting")?;
        let removed = self.repo.delete(id).await?;
        info!(%id, removed, "deleted listing");
        Ok(())
    }

    async fn upload(&self, file: Option<MediaFile>) -> Result<Option<String>, ServiceError> {
        let Some(file) = file.filter(|f| !f.is_placeholder()) else { return Ok(None) };
        match self.media.upload(file).await {
            Ok(url) => Ok(Some(url)),
            Err(e) => {
                error!(err = %e, "image upload failed");
                Err(e.into())
            }
        }
    }
}
