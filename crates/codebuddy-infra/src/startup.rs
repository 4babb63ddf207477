//! Startup checks and dependency wiring.
//!
//! [`build_processor`] resolves secrets, builds the configured provider and
//! image search, and reports anything missing as [`StartupIssue`]s. A missing
//! LLM key is an error shown to the user; a missing image key only disables
//! illustration.

use std::sync::Arc;

use serde::Serialize;

use codebuddy_core::image::BoxImageSearch;
use codebuddy_core::tutor::processor::{GenerationSettings, PromptProcessor};
use codebuddy_types::config::AppConfig;

use crate::image::pexels::{PEXELS_API_KEY_ENV, PexelsImageSearch};
use crate::llm::create_provider;
use crate::secret::EnvSecretProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Info,
}

/// A configuration problem detected at startup.
#[derive(Debug, Clone, Serialize)]
pub struct StartupIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl StartupIssue {
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

/// The processor plus whatever went wrong assembling it.
pub struct Startup {
    pub processor: PromptProcessor,
    pub issues: Vec<StartupIssue>,
}

/// Wire a [`PromptProcessor`] from config and the environment.
///
/// Each issue is logged once here (`error` for a missing LLM key, `info` for a
/// missing image key).
pub fn build_processor(config: &AppConfig, secrets: &EnvSecretProvider) -> Startup {
    let mut issues = Vec::new();
    let key_vars = config.llm.provider.api_key_env_vars();
    let primary_var = key_vars.first().copied().unwrap_or("GOOGLE_API_KEY");

    let provider = match secrets.first_of(key_vars) {
        Some((var, key)) => {
            tracing::debug!(provider = %config.llm.provider, key_var = var, "LLM API key found");
            Some(Arc::new(create_provider(&config.llm, &key)))
        }
        None => {
            let message = format!(
                "{} not found. Please set it as an environment variable.",
                key_vars.join(" or ")
            );
            tracing::error!(provider = %config.llm.provider, "{message}");
            issues.push(StartupIssue {
                severity: IssueSeverity::Error,
                message,
            });
            None
        }
    };

    let images = if !config.images.enabled {
        tracing::info!("image search disabled in config");
        None
    } else {
        match secrets.get(PEXELS_API_KEY_ENV) {
            Some(key) => match PexelsImageSearch::new(key, &config.images) {
                Ok(search) => Some(Arc::new(BoxImageSearch::new(search))),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to build image search client");
                    None
                }
            },
            None => {
                let message = format!("{PEXELS_API_KEY_ENV} not set; answers will not be illustrated");
                tracing::info!("{message}");
                issues.push(StartupIssue {
                    severity: IssueSeverity::Info,
                    message,
                });
                None
            }
        }
    };

    let settings = GenerationSettings {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
        structured_output: config.llm.structured_output,
    };

    Startup {
        processor: PromptProcessor::new(provider, images, settings).with_missing_key_hint(primary_var),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebuddy_types::llm::ProviderType;

    #[test]
    fn test_issue_severity_serializes_lowercase() {
        let issue = StartupIssue {
            severity: IssueSeverity::Error,
            message: "x".to_string(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "error");
        assert!(issue.is_error());
    }

    #[test]
    fn test_images_disabled_skips_lookup() {
        let mut config = AppConfig::default();
        config.images.enabled = false;
        let startup = build_processor(&config, &EnvSecretProvider::new());
        assert!(!startup.processor.has_image_search());
        assert!(startup.issues.iter().all(|i| !i.message.contains(PEXELS_API_KEY_ENV)));
    }

    #[test]
    fn test_missing_llm_key_is_reported() {
        // Point at a provider type whose key is not set in the test environment.
        let mut config = AppConfig::default();
        config.llm.provider = ProviderType::OpenAi;
        config.images.enabled = false;
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let startup = build_processor(&config, &EnvSecretProvider::new());
        assert!(!startup.processor.has_provider());
        let issue = startup.issues.iter().find(|i| i.is_error()).unwrap();
        assert!(issue.message.contains("OPENAI_API_KEY"));
    }
}
