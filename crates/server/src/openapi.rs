use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageDoc {
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDoc {
    #[serde(rename = "_id")]
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub name: String,
    pub about: String,
    /// Public URL of the uploaded image; absent when the listing has none.
    pub image: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

/// Multipart body for create and update. `id` is only read by update.
#[derive(Serialize, ToSchema)]
pub struct ListingFormDoc {
    pub id: Option<String>,
    pub name: Option<String>,
    pub about: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
pub struct IdDoc {
    pub id: String,
}

#[derive(Serialize, ToSchema)]
pub struct ListResponseDoc {
    pub response: Vec<ListingDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponseDoc {
    pub new_listing: ListingDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponseDoc {
    pub updated_listing: ListingDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::no_op,
        crate::routes::listings::list,
        crate::routes::listings::create,
        crate::routes::listings::update,
        crate::routes::listings::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ListingDoc,
            ListingFormDoc,
            IdDoc,
            ListResponseDoc,
            CreatedResponseDoc,
            UpdatedResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "listings")
    )
)]
pub struct ApiDoc;
