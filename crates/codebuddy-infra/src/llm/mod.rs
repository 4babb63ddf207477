//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](codebuddy_core::llm::provider::LlmProvider)
//! implementations plus [`create_provider`], which builds the configured one.

pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use codebuddy_core::llm::box_provider::BoxLlmProvider;
use codebuddy_types::config::LlmSettings;
use codebuddy_types::llm::ProviderType;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{gemini_defaults, openai_defaults};

/// Create a [`BoxLlmProvider`] from the `[llm]` settings and a resolved API key.
pub fn create_provider(settings: &LlmSettings, api_key: &SecretString) -> BoxLlmProvider {
    let key = api_key.expose_secret();
    let mut config = match settings.provider {
        ProviderType::Gemini => gemini_defaults(key, &settings.model),
        ProviderType::OpenAi => openai_defaults(key, &settings.model),
    };
    if let Some(base_url) = settings.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }

    tracing::debug!(
        provider = %config.provider_name,
        model = %config.model,
        base_url = %config.base_url,
        "creating LLM provider"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}
