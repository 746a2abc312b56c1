use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use models::listing;
use serde::Serialize;
use tracing::info;

use super::forms::{IdPayload, ListingForm};
use super::ServerState;
use crate::errors::JsonApiError;

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

#[derive(Serialize)]
pub struct ListResponse {
    pub response: Vec<listing::Model>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub new_listing: listing::Model,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub updated_listing: listing::Model,
}

#[utoipa::path(
    get,
    path = "/api/listings",
    tag = "listings",
    responses(
        (status = 200, description = "Every stored listing", body = crate::openapi::ListResponseDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ListResponse>, JsonApiError> {
    let response = state.listings.list().await?;
    info!(count = response.len(), "listed listings");
    Ok(Json(ListResponse { response }))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    tag = "listings",
    request_body(content = crate::openapi::ListingFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = crate::openapi::CreatedResponseDoc),
        (status = 400, description = "name or about missing", body = crate::openapi::MessageDoc),
        (status = 500, description = "Form, upload or store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let form = ListingForm::read(multipart).await?;
    let new_listing = state.listings.create(form.into_create()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { new_listing })))
}

#[utoipa::path(
    put,
    path = "/api/listings",
    tag = "listings",
    request_body(content = crate::openapi::ListingFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Listing updated", body = crate::openapi::UpdatedResponseDoc),
        (status = 400, description = "id missing or malformed", body = crate::openapi::MessageDoc),
        (status = 404, description = "No listing with that id", body = crate::openapi::MessageDoc),
        (status = 500, description = "Form, upload or store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UpdatedResponse>, JsonApiError> {
    let form = ListingForm::read(multipart).await?;
    let updated_listing = state.listings.update(form.into_update()).await?;
    Ok(Json(UpdatedResponse { updated_listing }))
}

#[utoipa::path(
    delete,
    path = "/api/listings",
    tag = "listings",
    request_body(content = crate::openapi::IdDoc, description = "JSON, urlencoded or multipart body carrying `id`"),
    responses(
        (status = 204, description = "Listing removed, or never existed"),
        (status = 400, description = "id missing or malformed", body = crate::openapi::MessageDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, payload: IdPayload) -> Result<StatusCode, JsonApiError> {
    state.listings.delete(payload.id.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {method} Not Allowed"),
    )
}
