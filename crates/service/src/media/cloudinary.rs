//! Signed uploads to the Cloudinary upload API.
//!
//! `POST {base_url}/v1_1/{cloud_name}/image/upload` with a multipart body of
//! `file`, `api_key`, `timestamp` and `signature`. The signature is the SHA-1
//! hex digest of the sorted `key=value&...` parameter string followed by the
//! API secret. The stored URL is the `secure_url` of the response.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, error, instrument};

use super::{MediaError, MediaFile, MediaUploader};

pub struct CloudinaryUploader {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(base_url: &str, cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, cloud_name, api_key, api_secret)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        let upload_url = format!("{}/v1_1/{}/image/upload", base_url.trim_end_matches('/'), cloud_name);
        Self { client, upload_url, api_key: api_key.to_string(), api_secret: api_secret.to_string() }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// Cloudinary request signature over `params` (file and api_key excluded).
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha1::digest(format!("{joined}{api_secret}").as_bytes()))
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    #[instrument(skip(self, file), fields(file_name = ?file.file_name, size = file.bytes.len()))]
    async fn upload(&self, file: MediaFile) -> Result<String, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.as_str())], &self.api_secret);

        let part = Part::bytes(file.bytes).file_name(file.file_name.unwrap_or_else(|| "upload".to_string()));
        let part = match file.content_type {
            Some(ct) => part.mime_str(&ct).map_err(|e| MediaError::InvalidFile(e.to_string()))?,
            None => part,
        };
        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .part("file", part);

        let resp = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| MediaError::Network(e.to_string()))?;
        let parsed: Option<UploadResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|p| p.error.map(|e| e.message))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("upload failed").to_string());
            error!(status = status.as_u16(), %message, "cloudinary rejected upload");
            return Err(MediaError::Rejected { status: status.as_u16(), message });
        }

        let url = parsed
            .and_then(|p| p.secure_url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MediaError::InvalidResponse("missing secure_url".into()))?;
        debug!(%url, "uploaded image");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn signature_matches_reference_vector() {
        let params = [
            ("timestamp", "1315060510"),
            ("public_id", "sample_image"),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
        ];
        assert_eq!(sign(&params, "abcd"), "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn upload_url_is_built_from_cloud_name() {
        let up = CloudinaryUploader::new("https://api.cloudinary.com/", "demo", "k", "s");
        assert_eq!(up.upload_url(), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }

    async fn fake_cloudinary(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
        let mut fields = HashMap::new();
        let mut file_len = 0;
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                file_len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            } else {
                fields.insert(name, field.text().await.unwrap_or_default());
            }
        }
        let timestamp = fields.get("timestamp").cloned().unwrap_or_default();
        let expected = sign(&[("timestamp", timestamp.as_str())], "secret");
        if fields.get("signature") != Some(&expected) || fields.get("api_key").map(String::as_str) != Some("key") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"message": "Invalid Signature"}})));
        }
        if file_len == 0 {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": {"message": "Empty file"}})));
        }
        (StatusCode::OK, Json(json!({"secure_url": "https://res.cloudinary.test/demo/image/upload/v1/photo.png"})))
    }

    async fn spawn_fake() -> String {
        let app = Router::new().route("/v1_1/demo/image/upload", post(fake_cloudinary));
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn png() -> MediaFile {
        MediaFile { file_name: Some("photo.png".into()), content_type: Some("image/png".into()), bytes: vec![0x89, b'P', b'N', b'G'] }
    }

    #[tokio::test]
    async fn signed_upload_returns_secure_url() {
        let base = spawn_fake().await;
        let up = CloudinaryUploader::new(&base, "demo", "key", "secret");
        let url = up.upload(png()).await.unwrap();
        assert_eq!(url, "https://res.cloudinary.test/demo/image/upload/v1/photo.png");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let base = spawn_fake().await;
        let up = CloudinaryUploader::new(&base, "demo", "key", "not-the-secret");
        let err = up.upload(png()).await.unwrap_err();
        match err {
            MediaError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let up = CloudinaryUploader::new("http://127.0.0.1:1", "demo", "key", "secret");
        let err = up.upload(png()).await.unwrap_err();
        assert!(matches!(err, MediaError::Network(_)));
    }
}
