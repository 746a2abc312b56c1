use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Api { status: u16, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
