//! Terminal client for the listings API: an HTTP client plus the explicit
//! view state the dashboard renders from.

pub mod client;
pub mod errors;
pub mod state;
pub mod types;

pub use client::ListingsClient;
pub use errors::DashboardError;
pub use state::{Dashboard, ModalForm, Notice, NoticeKind};
pub use types::{Attachment, Listing, ListingDraft, ABOUT_MAX_CHARS};
