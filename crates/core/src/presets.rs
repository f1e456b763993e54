//! Generation presets and vendor constants.
//!
//! Every identifier the workflow sends to Leonardo (model IDs,
//! preprocessor IDs, strengths, dimensions, the combine-prompt template)
//! is a named value here rather than an inline literal at a call site.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Model identifiers
// ---------------------------------------------------------------------------

/// Model used for the first-pass generation (Leonardo Kino XL).
pub const FIRST_PASS_MODEL_ID: &str = "1e60896f-3c26-4296-8ecc-53e2afecc132";

/// Model used for the combine pass (Leonardo Lightning XL).
pub const COMBINE_MODEL_ID: &str = "aa77f04e-3eec-4034-9c07-d0f619684628";

// ---------------------------------------------------------------------------
// Output dimensions
// ---------------------------------------------------------------------------

/// Width/height for full-resolution generations (API service).
pub const FULL_RESOLUTION: u32 = 896;

/// Width/height for preview generations (CLI tool).
pub const PREVIEW_RESOLUTION: u32 = 512;

// ---------------------------------------------------------------------------
// Controlnet reference parameters
// ---------------------------------------------------------------------------

/// Preprocessor ID for the "character reference" controlnet role.
pub const CHARACTER_REFERENCE_PREPROCESSOR_ID: u32 = 133;

/// Preprocessor ID for the "style reference" controlnet role.
pub const STYLE_REFERENCE_PREPROCESSOR_ID: u32 = 67;

/// Image-prompt strength applied during the first pass.
pub const FIRST_PASS_INIT_STRENGTH: f64 = 0.5;

/// Preset style requested for the combine pass.
pub const COMBINE_PRESET_STYLE: &str = "DYNAMIC";

/// Controlnet strength levels accepted by the generations endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthType {
    Low,
    Mid,
    High,
}

/// Origin of a controlnet reference image, as tagged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceSource {
    Uploaded,
    Generated,
}

// ---------------------------------------------------------------------------
// Combine-prompt template
// ---------------------------------------------------------------------------

/// Default instruction for the combine pass. Overridable via the
/// `COMBINE_PROMPT` environment variable (see `WorkflowSettings`).
pub const DEFAULT_COMBINE_PROMPT: &str = "Replace the hairstyle of a character in the reference image with a new hairstyle, ensuring perfect alignment with the character's head shape and facial features. Preserve the original lighting, shadows, and background for a realistic look. Blend the new hairstyle seamlessly, ensuring consistent textures, colors, and proportions for a natural integration without altering the character's facial expressions or outfit";

// ---------------------------------------------------------------------------
// Generation profiles
// ---------------------------------------------------------------------------

/// Fixed parameters for one call to the generations endpoint.
#[derive(Debug, Clone)]
pub struct GenerationProfile {
    /// Vendor model ID.
    pub model_id: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Whether to enable the vendor's Alchemy pipeline.
    pub alchemy: bool,
    /// Optional preset style (combine pass only).
    pub preset_style: Option<String>,
    /// Optional image-prompt strength (first pass only).
    pub init_strength: Option<f64>,
}

impl GenerationProfile {
    /// First-pass profile at full resolution: prompt plus the uploaded
    /// image as an image prompt.
    pub fn first_pass() -> Self {
        Self {
            model_id: FIRST_PASS_MODEL_ID.to_string(),
            width: FULL_RESOLUTION,
            height: FULL_RESOLUTION,
            alchemy: true,
            preset_style: None,
            init_strength: Some(FIRST_PASS_INIT_STRENGTH),
        }
    }

    /// Combine-pass profile at full resolution: controlnet references
    /// blend the uploaded and generated images.
    pub fn combine() -> Self {
        Self {
            model_id: COMBINE_MODEL_ID.to_string(),
            width: FULL_RESOLUTION,
            height: FULL_RESOLUTION,
            alchemy: true,
            preset_style: Some(COMBINE_PRESET_STYLE.to_string()),
            init_strength: None,
        }
    }

    /// Reduced-resolution first-pass profile for the CLI tool.
    pub fn preview() -> Self {
        Self {
            width: PREVIEW_RESOLUTION,
            height: PREVIEW_RESOLUTION,
            ..Self::first_pass()
        }
    }
}
