use std::time::Duration;

use configs::ClientConfig;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::DashboardError;
use crate::types::{Attachment, Listing, ListingDraft};

#[derive(Deserialize)]
struct ListEnvelope {
    response: Vec<Listing>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEnvelope {
    new_listing: Listing,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedEnvelope {
    updated_listing: Listing,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: String,
}

/// HTTP client for `/api/listings`. Every request carries the configured timeout.
#[derive(Clone)]
pub struct ListingsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ListingsClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self, DashboardError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        let endpoint = format!("{}/api/listings", cfg.base_url.trim_end_matches('/'));
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Listing>, DashboardError> {
        let resp = check(self.http.get(&self.endpoint).send().await?).await?;
        let body: ListEnvelope = resp.json().await?;
        debug!(count = body.response.len(), "fetched listings");
        Ok(body.response)
    }

    #[instrument(skip(self, draft, attachment), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ListingDraft, attachment: Option<&Attachment>) -> Result<Listing, DashboardError> {
        let form = listing_form(draft, attachment)?;
        let resp = check(self.http.post(&self.endpoint).multipart(form).send().await?).await?;
        let body: CreatedEnvelope = resp.json().await?;
        Ok(body.new_listing)
    }

    #[instrument(skip(self, draft, attachment), fields(name = %draft.name))]
    pub async fn update(
        &self,
        id: &str,
        draft: &ListingDraft,
        attachment: Option<&Attachment>,
    ) -> Result<Listing, DashboardError> {
        let form = listing_form(draft, attachment)?.text("id", id.to_string());
        let resp = check(self.http.put(&self.endpoint).multipart(form).send().await?).await?;
        let body: UpdatedEnvelope = resp.json().await?;
        Ok(body.updated_listing)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), DashboardError> {
        check(self.http.delete(&self.endpoint).json(&json!({ "id": id })).send().await?).await?;
        Ok(())
    }
}

fn listing_form(draft: &ListingDraft, attachment: Option<&Attachment>) -> Result<Form, DashboardError> {
    let form = Form::new().text("name", draft.name.clone()).text("about", draft.about.clone());
    let Some(att) = attachment else { return Ok(form) };
    let part = Part::bytes(att.bytes.clone())
        .file_name(att.file_name.clone())
        .mime_str(&att.content_type)?;
    Ok(form.part("image", part))
}

async fn check(resp: Response) -> Result<Response, DashboardError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|e| e.message)
        .unwrap_or(text);
    Err(DashboardError::Api { status: status.as_u16(), message })
}
