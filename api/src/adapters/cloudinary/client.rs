//! Cloudinary image CDN client
//!
//! Uploads go to the `vivac` folder with a SHA-256 signed request; deletes
//! use the destroy endpoint with the same signature scheme.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::domain::ports::{ImageStore, StoredImage};
use crate::error::CloudinaryError;

const UPLOAD_FOLDER: &str = "vivac";

/// Cloudinary REST API client
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    public_id_re: Regex,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            cloud_name,
            api_key,
            api_secret,
            // Delivery URLs look like
            // .../image/upload/v123/vivac/abc123.jpg
            public_id_re: Regex::new(r"/vivac/([^/.]+)").expect("valid regex"),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.cloud_name, action
        )
    }

    /// Sign the given params (already sorted by key) per Cloudinary's scheme:
    /// hex(sha256("k1=v1&k2=v2" + api_secret))
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let mut hasher = Sha256::new();
        hasher.update(to_sign.join("&"));
        hasher.update(&self.api_secret);
        hex::encode(hasher.finalize())
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CloudinaryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 {
            return Err(CloudinaryError::Unauthorized);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_else(|_| status.to_string());

        Err(CloudinaryError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<StoredImage, CloudinaryError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", UPLOAD_FOLDER),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let file_part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("folder", UPLOAD_FOLDER)
            .text("signature_algorithm", "sha256")
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CloudinaryError::Deserialization(e.to_string()))?;

        tracing::debug!(public_id = %body.public_id, "image uploaded");

        Ok(StoredImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), CloudinaryError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("public_id", public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("api_key", self.api_key.clone())
            .text("signature_algorithm", "sha256")
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;

        let body: DestroyResponse = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CloudinaryError::Deserialization(e.to_string()))?;

        // Destroy reports "not found" with a 200; treat it as success so
        // photo removal stays idempotent.
        if body.result != "ok" && body.result != "not found" {
            return Err(CloudinaryError::Api {
                status: 200,
                message: body.result,
            });
        }

        Ok(())
    }

    fn public_id_from_url(&self, url: &str) -> Result<String, CloudinaryError> {
        self.public_id_re
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| format!("{}/{}", UPLOAD_FOLDER, m.as_str()))
            .ok_or_else(|| CloudinaryError::InvalidUrl(url.to_string()))
    }
}
