//! Leonardo REST wire-format types.
//!
//! The generations endpoint mixes naming conventions: `modelId`,
//! `imagePrompts`, `presetStyle` and the controlnet fields are
//! camelCase while `num_images` and `init_strength` stay snake_case.
//! The serde attributes below reproduce that mix exactly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use restyle_core::presets::{
    GenerationProfile, ReferenceSource, StrengthType, CHARACTER_REFERENCE_PREPROCESSOR_ID,
    STYLE_REFERENCE_PREPROCESSOR_ID,
};

// ---------------------------------------------------------------------------
// init-image
// ---------------------------------------------------------------------------

/// Response envelope for `POST /init-image`.
#[derive(Debug, Deserialize)]
pub struct InitImageResponse {
    #[serde(rename = "uploadInitImage")]
    pub upload_init_image: Option<UploadSlot>,
}

/// A presigned upload target issued by the init-image endpoint.
///
/// Consumed exactly once by the upload step. `fields` carries the
/// vendor-issued form fields that must accompany the file upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadSlot {
    /// Presigned upload URL.
    #[serde(default)]
    pub url: String,
    /// Form fields to submit alongside the file. May arrive either as a
    /// JSON object or as a JSON-encoded string.
    #[serde(default, deserialize_with = "deserialize_fields")]
    pub fields: HashMap<String, String>,
    /// Identifier of the uploaded image, referenced by later steps.
    #[serde(default)]
    pub id: String,
}

/// Decode `fields` from either an object or a JSON-encoded string.
fn deserialize_fields<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldsRepr {
        Map(HashMap<String, serde_json::Value>),
        Encoded(String),
    }

    let map = match Option::<FieldsRepr>::deserialize(deserializer)? {
        None => HashMap::new(),
        Some(FieldsRepr::Map(map)) => map,
        Some(FieldsRepr::Encoded(text)) => {
            serde_json::from_str(&text).map_err(serde::de::Error::custom)?
        }
    };

    Ok(map.into_iter().map(|(k, v)| (k, stringify(v))).collect())
}

/// Presigned form values are normally strings; anything else is kept as
/// its JSON rendering.
fn stringify(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// generations (request)
// ---------------------------------------------------------------------------

/// Request body for `POST /generations`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub height: u32,
    pub width: u32,
    pub model_id: String,
    pub prompt: String,
    #[serde(rename = "num_images")]
    pub num_images: u32,
    pub alchemy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompts: Option<Vec<String>>,
    #[serde(rename = "init_strength", skip_serializing_if = "Option::is_none")]
    pub init_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controlnets: Option<Vec<ControlnetReference>>,
}

impl GenerationRequest {
    /// First-pass request: the uploaded image drives the generation as
    /// an image prompt.
    pub fn first_pass(profile: &GenerationProfile, prompt: &str, uploaded_image_id: &str) -> Self {
        Self {
            height: profile.height,
            width: profile.width,
            model_id: profile.model_id.clone(),
            prompt: prompt.to_string(),
            num_images: 1,
            alchemy: profile.alchemy,
            image_prompts: Some(vec![uploaded_image_id.to_string()]),
            init_strength: profile.init_strength,
            preset_style: profile.preset_style.clone(),
            controlnets: None,
        }
    }

    /// Combine-pass request: two controlnet references blend the
    /// uploaded image (character) with the first-pass output (style).
    pub fn combine(
        profile: &GenerationProfile,
        prompt: &str,
        uploaded_image_id: &str,
        generated_image_id: &str,
        num_images: u32,
    ) -> Self {
        Self {
            height: profile.height,
            width: profile.width,
            model_id: profile.model_id.clone(),
            prompt: prompt.to_string(),
            num_images,
            alchemy: profile.alchemy,
            image_prompts: None,
            init_strength: None,
            preset_style: profile.preset_style.clone(),
            controlnets: Some(vec![
                ControlnetReference::character_reference(uploaded_image_id),
                ControlnetReference::style_reference(generated_image_id),
            ]),
        }
    }
}

/// One controlnet reference entry in a generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlnetReference {
    pub init_image_id: String,
    pub init_image_type: ReferenceSource,
    pub preprocessor_id: u32,
    pub strength_type: StrengthType,
}

impl ControlnetReference {
    /// Character-reference entry for the uploaded source image.
    pub fn character_reference(image_id: &str) -> Self {
        Self {
            init_image_id: image_id.to_string(),
            init_image_type: ReferenceSource::Uploaded,
            preprocessor_id: CHARACTER_REFERENCE_PREPROCESSOR_ID,
            strength_type: StrengthType::Mid,
        }
    }

    /// Style-reference entry for the first-pass generated image.
    pub fn style_reference(image_id: &str) -> Self {
        Self {
            init_image_id: image_id.to_string(),
            init_image_type: ReferenceSource::Generated,
            preprocessor_id: STYLE_REFERENCE_PREPROCESSOR_ID,
            strength_type: StrengthType::High,
        }
    }
}

// ---------------------------------------------------------------------------
// generations (responses)
// ---------------------------------------------------------------------------

/// Response envelope for `POST /generations`.
#[derive(Debug, Deserialize)]
pub struct CreateGenerationResponse {
    #[serde(rename = "sdGenerationJob")]
    pub sd_generation_job: Option<SdGenerationJob>,
}

/// The queued generation job.
#[derive(Debug, Deserialize)]
pub struct SdGenerationJob {
    #[serde(rename = "generationId", default)]
    pub generation_id: String,
}

/// Response envelope for `GET /generations/{id}`.
#[derive(Debug, Deserialize)]
pub struct GenerationStatusResponse {
    pub generations_by_pk: Option<GenerationRecord>,
}

/// The generation record, present once the job is queryable.
#[derive(Debug, Deserialize)]
pub struct GenerationRecord {
    #[serde(default)]
    pub generated_images: Vec<GeneratedImage>,
}

/// One output image of a completed generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
}
