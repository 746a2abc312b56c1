//! Service layer for the listing dashboard.
//! - `listing`: the create/list/update/delete pipeline over a repository.
//! - `media`: the image upload collaborator (Cloudinary).
//! - Errors from both are unified in `errors::ServiceError`.

pub mod errors;
pub mod listing;
pub mod media;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
