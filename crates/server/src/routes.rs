use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::listing::ListingService;

use crate::openapi::ApiDoc;

pub mod forms;
pub mod listings;

#[derive(Clone)]
pub struct ServerState {
    pub listings: Arc<ListingService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Accepts anything and does nothing. Upload widgets that insist on their own
/// request can be pointed here.
#[utoipa::path(get, path = "/api/no-op", tag = "listings", responses((status = 200, description = "Literal body `noop`")))]
pub async fn no_op() -> &'static str {
    "noop"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, docs, the listings endpoint and the no-op endpoint.
pub fn build_router(state: ServerState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route(
            "/api/listings",
            get(listings::list)
                .post(listings::create)
                .put(listings::update)
                .delete(listings::delete)
                // axum answers HEAD with the GET handler unless told otherwise
                .head(listings::method_not_allowed)
                .fallback(listings::method_not_allowed),
        )
        .route("/api/no-op", any(no_op))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(http_trace())
}

/// Request spans and responses at INFO, failures at ERROR.
fn http_trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
