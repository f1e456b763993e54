use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::{routing::post, Json, Router};
use serde::Serialize;

use restyle_core::prompt::{validate_num_images, validate_prompt};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Maximum accepted upload size: 25 MiB covers any source photo.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Successful response payload: combined image URLs in service order.
#[derive(Serialize)]
pub struct GenerateImageResponse {
    pub combined_image_urls: Vec<String>,
}

/// The parts extracted from the multipart request.
struct GenerateImageRequest {
    image: Vec<u8>,
    extension: String,
    prompt: String,
    num_images: u32,
}

/// POST /generate-image -- run the full workflow for one uploaded image.
///
/// Expects multipart parts `image` (file), `prompt` (text), and
/// `num_images` (text integer). Responds with the combined image URLs,
/// or `{"error": ...}` with status 500 when any workflow step fails.
async fn generate_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<GenerateImageResponse>> {
    let request = read_request(multipart).await?;

    validate_prompt(&request.prompt)?;
    validate_num_images(request.num_images)?;

    tracing::info!(
        prompt_len = request.prompt.len(),
        num_images = request.num_images,
        extension = %request.extension,
        "Starting generation workflow",
    );

    let urls = state
        .workflow
        .run_combined(
            request.image,
            &request.extension,
            &request.prompt,
            request.num_images,
        )
        .await?;

    Ok(Json(GenerateImageResponse {
        combined_image_urls: urls,
    }))
}

/// Pull the three expected parts out of the multipart stream.
async fn read_request(mut multipart: Multipart) -> ApiResult<GenerateImageRequest> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut prompt: Option<String> = None;
    let mut num_images: Option<u32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "image" => {
                let extension = field
                    .file_name()
                    .map(extension_of)
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;
                image = Some((bytes.to_vec(), extension));
            }
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read prompt: {e}")))?;
                prompt = Some(text);
            }
            "num_images" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read num_images: {e}")))?;
                let count = text.trim().parse().map_err(|_| {
                    ApiError::BadRequest(format!("num_images must be an integer (got '{text}')"))
                })?;
                num_images = Some(count);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let (image, extension) =
        image.ok_or_else(|| ApiError::BadRequest("Missing 'image' file part".to_string()))?;
    let prompt =
        prompt.ok_or_else(|| ApiError::BadRequest("Missing 'prompt' part".to_string()))?;
    let num_images = num_images
        .ok_or_else(|| ApiError::BadRequest("Missing 'num_images' part".to_string()))?;

    Ok(GenerateImageRequest {
        image,
        extension,
        prompt,
        num_images,
    })
}

/// Last dot-separated component of the filename; the whole name when
/// there is no dot.
fn extension_of(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or_default().to_string()
}

/// Mount the generation route with its enlarged body limit.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-image", post(generate_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
