//! Listing CRUD: repository seam plus the request pipeline on top of it.

pub mod repository;
pub mod service;

pub use repository::{ListingRepository, NewListing, SeaOrmListingRepository};
pub use service::{CreateListing, ImagePolicy, ListingService, UpdateListing};

use uuid::Uuid;

use crate::errors::ServiceError;

/// Parse a listing id supplied by a client. `action` names the operation for the error message.
pub fn parse_id(raw: Option<&str>, action: &str) -> Result<Uuid, ServiceError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(ServiceError::Validation(format!("ID is required for {action} the listing")));
    };
    Uuid::parse_str(raw).map_err(|_| ServiceError::Validation(format!("invalid listing id: {raw}")))
}
