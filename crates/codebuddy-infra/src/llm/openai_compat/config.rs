//! Configuration and per-provider defaults for OpenAI-compatible endpoints.
//!
//! Gemini and OpenAI both speak the chat completions protocol; each gets a
//! factory returning an [`OpenAiCompatConfig`] with the right base URL and
//! capabilities.

use codebuddy_types::llm::ProviderCapabilities;

/// Gemini's OpenAI-compatible beta endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Provider name used in logs ("gemini", "openai").
    pub provider_name: String,
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

impl OpenAiCompatConfig {
    /// Point the provider at a different endpoint (proxy, regional gateway).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Google Gemini defaults.
///
/// Capabilities: structured output, vision; 1M context, 64K output.
pub fn gemini_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            structured_output: true,
            vision: true,
            max_context_tokens: 1_000_000,
            max_output_tokens: 65_536,
        },
    }
}

/// OpenAI defaults.
///
/// Capabilities: structured output, vision; 128K context, 16K output.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            structured_output: true,
            vision: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}
