//! Validation for user-supplied generation inputs.

use crate::error::CoreError;

/// Maximum length for a generation prompt in characters.
pub const MAX_PROMPT_LENGTH: usize = 10_000;

/// Maximum number of images one combine request may ask for.
pub const MAX_NUM_IMAGES: u32 = 8;

/// Validate a generation prompt: must be non-empty and within length limit.
pub fn validate_prompt(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        ));
    }
    if text.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {})",
            text.len()
        )));
    }
    Ok(())
}

/// Validate the requested image count: 1 to [`MAX_NUM_IMAGES`].
pub fn validate_num_images(count: u32) -> Result<(), CoreError> {
    if count == 0 || count > MAX_NUM_IMAGES {
        return Err(CoreError::Validation(format!(
            "num_images must be between 1 and {MAX_NUM_IMAGES} (got {count})"
        )));
    }
    Ok(())
}
