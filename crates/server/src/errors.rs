use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use models::errors::ModelError;
use service::errors::ServiceError;
use tracing::error;

/// Error response rendered as `{ "message": ..., "detail"?: ... }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    /// The request body could not be read as a form.
    pub fn form_parse(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error parsing form data", Some(detail.into()))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, msg, None)
            }
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, msg, None),
            ServiceError::Media(e) => {
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error uploading image", Some(e.to_string()))
            }
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Store operation failed", Some(msg))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, detail = ?self.detail, "request failed");
        }
        (self.status, Json(MessageBody::new(self.message, self.detail))).into_response()
    }
}
