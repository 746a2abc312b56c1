//! Request body readers for the listings endpoint.

use axum::{
    async_trait,
    body::Bytes,
    extract::{multipart::MultipartRejection, FromRequest, Multipart, Request},
    http::header,
    Form,
};
use serde::Deserialize;
use serde_json::Value;
use service::listing::{CreateListing, UpdateListing};
use service::media::MediaFile;

use crate::errors::JsonApiError;

/// Fields of a listing form submission. Text fields keep their first
/// occurrence; unknown fields are skipped.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub about: Option<String>,
    pub image: Option<MediaFile>,
}

impl ListingForm {
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, JsonApiError> {
        let mut multipart = multipart.map_err(|e| JsonApiError::form_parse(e.body_text()))?;
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| JsonApiError::form_parse(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "id" | "name" | "about" => {
                    let value = field.text().await.map_err(|e| JsonApiError::form_parse(e.body_text()))?;
                    let slot = match name.as_str() {
                        "id" => &mut form.id,
                        "name" => &mut form.name,
                        _ => &mut form.about,
                    };
                    if slot.is_none() {
                        *slot = Some(value);
                    }
                }
                "image" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| JsonApiError::form_parse(e.body_text()))?;
                    let file = MediaFile { file_name, content_type, bytes: bytes.to_vec() };
                    if form.image.is_none() && !file.is_placeholder() {
                        form.image = Some(file);
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn into_create(self) -> CreateListing {
        CreateListing { name: self.name, about: self.about, image: self.image }
    }

    pub fn into_update(self) -> UpdateListing {
        UpdateListing { id: self.id, name: self.name, about: self.about, image: self.image }
    }
}

/// The `id` of a delete request, read from a JSON, urlencoded or multipart body.
/// An empty body yields no id.
#[derive(Debug, Default, Deserialize)]
pub struct IdPayload {
    #[serde(default)]
    pub id: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for IdPayload
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let form = ListingForm::read(Multipart::from_request(req, state).await).await?;
            return Ok(Self { id: form.id });
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(payload) = Form::<IdPayload>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::form_parse(e.body_text()))?;
            return Ok(payload);
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonApiError::form_parse(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(&body).map_err(|e| JsonApiError::form_parse(e.to_string()))?;
        Ok(Self::from_json(&value))
    }
}

impl IdPayload {
    /// Non-string ids are kept as their JSON text so id parsing rejects them as malformed.
    fn from_json(value: &Value) -> Self {
        let id = match value.get("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self { id }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_id_is_read_as_text() {
        assert_eq!(IdPayload::from_json(&json!({"id": "abc"})).id.as_deref(), Some("abc"));
        assert_eq!(IdPayload::from_json(&json!({"id": 5})).id.as_deref(), Some("5"));
        assert!(IdPayload::from_json(&json!({"id": null})).id.is_none());
        assert!(IdPayload::from_json(&json!({})).id.is_none());
        assert!(IdPayload::from_json(&json!([1, 2])).id.is_none());
    }
}
