//! REST API client for the Leonardo HTTP endpoints.
//!
//! Wraps the four endpoints the workflow touches (init-image, presigned
//! upload, generations, generation status) using [`reqwest`]. The
//! presigned upload goes to a vendor-issued URL and deliberately skips
//! the bearer token; every other call carries it.

use std::collections::HashMap;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};

use crate::config::LeonardoConfig;
use crate::types::{
    CreateGenerationResponse, GenerationRequest, GenerationStatusResponse, InitImageResponse,
};

/// HTTP client for the Leonardo REST API.
pub struct LeonardoApi {
    client: reqwest::Client,
    api_base: String,
    authorization: String,
}

/// Errors from the Leonardo REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum LeonardoApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Leonardo returned a non-2xx status code.
    #[error("Leonardo API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The presigned upload target returned a non-2xx status code.
    #[error("Image upload failed ({status}): {body}")]
    UploadFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl LeonardoApi {
    /// Create a new API client from credentials.
    pub fn new(config: LeonardoConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across workflows).
    pub fn with_client(client: reqwest::Client, config: LeonardoConfig) -> Self {
        Self {
            client,
            api_base: config.api_base,
            authorization: format!("Bearer {}", config.api_key),
        }
    }

    /// Request a presigned upload slot for an image with the given
    /// file extension.
    ///
    /// Sends a `POST /init-image` request. The response carries the
    /// upload URL, the form fields the upload must echo back, and the
    /// ID later generation requests reference the image by.
    pub async fn init_image(&self, extension: &str) -> Result<InitImageResponse, LeonardoApiError> {
        let body = serde_json::json!({ "extension": extension });

        let response = self
            .client
            .post(format!("{}/init-image", self.api_base))
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Upload image bytes to a presigned target.
    ///
    /// Submits a multipart form carrying every presigned field as a text
    /// part plus the file content under the `file` key. The target URL
    /// embeds its own authorization, so no bearer token is attached.
    pub async fn upload_image(
        &self,
        upload_url: &str,
        fields: &HashMap<String, String>,
        image: Vec<u8>,
        filename: String,
    ) -> Result<(), LeonardoApiError> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part("file", Part::bytes(image).file_name(filename));

        let response = self.client.post(upload_url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LeonardoApiError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Submit a generation request.
    ///
    /// Sends a `POST /generations` request. Returns the queued job's
    /// `generationId` inside the response envelope.
    pub async fn create_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<CreateGenerationResponse, LeonardoApiError> {
        let response = self
            .client
            .post(format!("{}/generations", self.api_base))
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve the record for a specific generation.
    ///
    /// Sends a `GET /generations/{id}` request. The record's
    /// `generated_images` list is empty until the job finishes.
    pub async fn get_generation(
        &self,
        generation_id: &str,
    ) -> Result<GenerationStatusResponse, LeonardoApiError> {
        let response = self
            .client
            .get(format!("{}/generations/{}", self.api_base, generation_id))
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the raw bytes behind a result URL (CDN download, no auth).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, LeonardoApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`LeonardoApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, LeonardoApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LeonardoApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LeonardoApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
