use async_trait::async_trait;
use models::listing::{self, ListingChanges};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Fields of a listing about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewListing {
    pub name: String,
    pub about: String,
    pub image: Option<String>,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<listing::Model>, ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<listing::Model>, ServiceError>;
    async fn create(&self, new: NewListing) -> Result<listing::Model, ServiceError>;
    /// `Ok(None)` when no listing has `id`.
    async fn update(&self, id: Uuid, changes: ListingChanges) -> Result<Option<listing::Model>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmListingRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn list(&self) -> Result<Vec<listing::Model>, ServiceError> {
        Ok(listing::find_all(&self.db).await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<listing::Model>, ServiceError> {
        Ok(listing::find(&self.db, id).await?)
    }

    async fn create(&self, new: NewListing) -> Result<listing::Model, ServiceError> {
        Ok(listing::create(&self.db, &new.name, &new.about, new.image).await?)
    }

    async fn update(&self, id: Uuid, changes: ListingChanges) -> Result<Option<listing::Model>, ServiceError> {
        Ok(listing::update(&self.db, id, changes).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(listing::delete(&self.db, id).await? > 0)
    }
}
