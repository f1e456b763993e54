//! The upload → generate → combine workflow.
//!
//! Control flows strictly linearly: each step consumes the previous
//! step's output, and any missing field or non-success status is
//! terminal for the invocation. Remote resources created before a
//! failure (an uploaded image, a queued job) are not cleaned up — the
//! vendor exposes no cancellation for in-flight jobs.

use restyle_core::poll::{next_interval, PollPolicy};

use crate::api::{LeonardoApi, LeonardoApiError};
use crate::config::WorkflowSettings;
use crate::types::{GeneratedImage, GenerationRequest, UploadSlot};

/// Failures surfaced by the workflow, in addition to transport errors.
///
/// The display strings are part of the HTTP service's response contract
/// and match the messages the service has always returned.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The init-image response lacked the upload URL, form fields, or
    /// image ID.
    #[error("Invalid response structure for init image upload")]
    InvalidInitImageResponse,

    /// The first generation response lacked a generation ID.
    #[error("Invalid response structure for image generation")]
    InvalidGenerationResponse,

    /// The combine generation response lacked a generation ID.
    #[error("Invalid response structure for final image generation")]
    InvalidCombinedResponse,

    /// The first-pass job completed (or timed out) with no output images.
    #[error("No images generated in the first request")]
    NoImagesGenerated,

    /// The combine job completed (or timed out) with no output images.
    #[error("No combined images generated")]
    NoCombinedImages,

    /// Failed to persist a downloaded result locally.
    #[error("Failed to write image to {path}")]
    Persist {
        /// Destination path.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A transport or API-level error from the client layer.
    #[error(transparent)]
    Api(#[from] LeonardoApiError),
}

/// Orchestrates one Leonardo workflow invocation at a time.
///
/// Holds no mutable state: concurrent invocations share only the
/// underlying HTTP connection pool and immutable settings.
pub struct ImageWorkflow {
    api: LeonardoApi,
    settings: WorkflowSettings,
}

impl ImageWorkflow {
    pub fn new(api: LeonardoApi, settings: WorkflowSettings) -> Self {
        Self { api, settings }
    }

    /// The underlying API client (shared connection pool).
    pub fn api(&self) -> &LeonardoApi {
        &self.api
    }

    // ---- individual steps ----

    /// Ask for a presigned upload slot.
    ///
    /// Fails with [`WorkflowError::InvalidInitImageResponse`] when the
    /// URL, form fields, or image ID is missing or empty; no upload is
    /// attempted in that case.
    pub async fn request_upload_slot(&self, extension: &str) -> Result<UploadSlot, WorkflowError> {
        let response = self.api.init_image(extension).await?;
        let slot = response.upload_init_image.unwrap_or_default();

        if slot.url.is_empty() || slot.fields.is_empty() || slot.id.is_empty() {
            return Err(WorkflowError::InvalidInitImageResponse);
        }

        tracing::info!(image_id = %slot.id, "Acquired upload slot");
        Ok(slot)
    }

    /// Transfer the source image to the presigned target.
    pub async fn upload_image(
        &self,
        slot: &UploadSlot,
        image: Vec<u8>,
        extension: &str,
    ) -> Result<(), WorkflowError> {
        let filename = format!("image.{extension}");
        self.api
            .upload_image(&slot.url, &slot.fields, image, filename)
            .await?;

        tracing::info!(image_id = %slot.id, "Uploaded source image");
        Ok(())
    }

    /// Submit the first-pass generation for the uploaded image.
    ///
    /// Fails with [`WorkflowError::InvalidGenerationResponse`] when the
    /// response carries no generation ID; no poll is attempted then.
    pub async fn submit_generation(
        &self,
        prompt: &str,
        uploaded_image_id: &str,
    ) -> Result<String, WorkflowError> {
        let request =
            GenerationRequest::first_pass(&self.settings.first_pass, prompt, uploaded_image_id);
        let response = self.api.create_generation(&request).await?;

        let generation_id = response
            .sd_generation_job
            .map(|job| job.generation_id)
            .unwrap_or_default();
        if generation_id.is_empty() {
            return Err(WorkflowError::InvalidGenerationResponse);
        }

        tracing::info!(%generation_id, "Submitted first-pass generation");
        Ok(generation_id)
    }

    /// Await the first-pass job and return its output images.
    ///
    /// Fails with [`WorkflowError::NoImagesGenerated`] when the job
    /// yields nothing within the polling budget; the combine step is
    /// not reached in that case.
    pub async fn await_generation(
        &self,
        generation_id: &str,
    ) -> Result<Vec<GeneratedImage>, WorkflowError> {
        let images = self
            .await_images(generation_id, &self.settings.first_poll)
            .await?;
        if images.is_empty() {
            return Err(WorkflowError::NoImagesGenerated);
        }
        Ok(images)
    }

    /// Submit the combine-pass generation blending the uploaded and
    /// generated images.
    pub async fn submit_combined_generation(
        &self,
        uploaded_image_id: &str,
        generated_image_id: &str,
        num_images: u32,
    ) -> Result<String, WorkflowError> {
        let request = GenerationRequest::combine(
            &self.settings.combine,
            &self.settings.combine_prompt,
            uploaded_image_id,
            generated_image_id,
            num_images,
        );
        let response = self.api.create_generation(&request).await?;

        let generation_id = response
            .sd_generation_job
            .map(|job| job.generation_id)
            .unwrap_or_default();
        if generation_id.is_empty() {
            return Err(WorkflowError::InvalidCombinedResponse);
        }

        tracing::info!(%generation_id, "Submitted combine generation");
        Ok(generation_id)
    }

    /// Await the combine job and return all output images in service
    /// order.
    pub async fn await_combined_generation(
        &self,
        generation_id: &str,
    ) -> Result<Vec<GeneratedImage>, WorkflowError> {
        let images = self
            .await_images(generation_id, &self.settings.combine_poll)
            .await?;
        if images.is_empty() {
            return Err(WorkflowError::NoCombinedImages);
        }
        Ok(images)
    }

    // ---- end-to-end drivers ----

    /// Run the full pipeline: upload, first pass, combine. Returns the
    /// combined image URLs in the order the service reported them.
    pub async fn run_combined(
        &self,
        image: Vec<u8>,
        extension: &str,
        prompt: &str,
        num_images: u32,
    ) -> Result<Vec<String>, WorkflowError> {
        let slot = self.request_upload_slot(extension).await?;
        self.upload_image(&slot, image, extension).await?;

        let first_job = self.submit_generation(prompt, &slot.id).await?;
        let first_images = self.await_generation(&first_job).await?;

        // The combine pass references the first output by ID; an image
        // record without one is as useless as no image at all.
        let generated_image_id = first_images[0].id.clone();
        if generated_image_id.is_empty() {
            return Err(WorkflowError::NoImagesGenerated);
        }

        let combine_job = self
            .submit_combined_generation(&slot.id, &generated_image_id, num_images)
            .await?;
        let combined = self.await_combined_generation(&combine_job).await?;

        Ok(combined.into_iter().map(|image| image.url).collect())
    }

    /// Run the first pass only and return its first output image.
    pub async fn run_preview(
        &self,
        image: Vec<u8>,
        extension: &str,
        prompt: &str,
    ) -> Result<GeneratedImage, WorkflowError> {
        let slot = self.request_upload_slot(extension).await?;
        self.upload_image(&slot, image, extension).await?;

        let job = self.submit_generation(prompt, &slot.id).await?;
        let mut images = self.await_generation(&job).await?;

        Ok(images.remove(0))
    }

    // ---- private helpers ----

    /// Sleep out the policy's initial wait, then fetch the generation
    /// record up to `max_attempts` times with backoff between fetches.
    /// Returns an empty list when the budget is exhausted.
    async fn await_images(
        &self,
        generation_id: &str,
        policy: &PollPolicy,
    ) -> Result<Vec<GeneratedImage>, WorkflowError> {
        tokio::time::sleep(policy.initial_wait).await;

        let mut interval = policy.retry_interval;
        for attempt in 1..=policy.max_attempts {
            let response = self.api.get_generation(generation_id).await?;
            let images = response
                .generations_by_pk
                .map(|record| record.generated_images)
                .unwrap_or_default();

            if !images.is_empty() {
                tracing::info!(%generation_id, count = images.len(), "Generation complete");
                return Ok(images);
            }

            tracing::debug!(%generation_id, attempt, "Generation not ready yet");
            if attempt < policy.max_attempts {
                tokio::time::sleep(interval).await;
                interval = next_interval(interval, policy);
            }
        }

        Ok(Vec::new())
    }
}
