//! Client credentials and workflow settings loaded from the environment.

use restyle_core::error::CoreError;
use restyle_core::poll::PollPolicy;
use restyle_core::presets::{GenerationProfile, DEFAULT_COMBINE_PROMPT};

/// Default base URL for the Leonardo REST API.
pub const DEFAULT_API_BASE: &str = "https://cloud.leonardo.ai/api/rest/v1";

/// Leonardo API credentials and endpoint location.
#[derive(Debug, Clone)]
pub struct LeonardoConfig {
    /// Bearer token sent in the `authorization` header.
    pub api_key: String,
    /// Base URL for the REST API (no trailing slash).
    pub api_base: String,
}

impl LeonardoConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Default                                  |
    /// |---------------------|------------------------------------------|
    /// | `LEONARDO_API_KEY`  | (required)                               |
    /// | `LEONARDO_API_BASE` | `https://cloud.leonardo.ai/api/rest/v1`  |
    ///
    /// Returns [`CoreError::Config`] when the API key is missing, so
    /// binaries fail at startup rather than at the first request.
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var("LEONARDO_API_KEY")
            .map_err(|_| CoreError::Config("LEONARDO_API_KEY must be set".to_string()))?;

        let api_base = std::env::var("LEONARDO_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Ok(Self { api_key, api_base })
    }

    /// Build a config with an explicit key and base URL (used by tests
    /// to point the client at a stub server).
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }
}

/// Everything one workflow invocation needs besides credentials:
/// generation profiles, polling policies, and the combine prompt.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Profile for the first-pass generation.
    pub first_pass: GenerationProfile,
    /// Profile for the combine pass.
    pub combine: GenerationProfile,
    /// Instruction prompt for the combine pass.
    pub combine_prompt: String,
    /// Polling policy for the first-pass job.
    pub first_poll: PollPolicy,
    /// Polling policy for the combine job.
    pub combine_poll: PollPolicy,
}

impl WorkflowSettings {
    /// Full-resolution settings for the API service (both passes).
    pub fn full() -> Self {
        Self {
            first_pass: GenerationProfile::first_pass(),
            combine: GenerationProfile::combine(),
            combine_prompt: DEFAULT_COMBINE_PROMPT.to_string(),
            first_poll: PollPolicy::first_pass(),
            combine_poll: PollPolicy::combine(),
        }
    }

    /// Reduced-resolution settings for the CLI tool (first pass only).
    pub fn preview() -> Self {
        Self {
            first_pass: GenerationProfile::preview(),
            first_poll: PollPolicy::preview(),
            ..Self::full()
        }
    }

    /// [`WorkflowSettings::full`] with the `COMBINE_PROMPT` environment
    /// override applied.
    pub fn from_env() -> Self {
        let mut settings = Self::full();
        if let Ok(prompt) = std::env::var("COMBINE_PROMPT") {
            if !prompt.trim().is_empty() {
                settings.combine_prompt = prompt;
            }
        }
        settings
    }
}
