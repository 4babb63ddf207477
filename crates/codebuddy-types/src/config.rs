//! Application configuration types for CodeBuddy.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the LLM
//! backend, image search, the web server, and document export. Secrets are
//! never stored here -- they come from the process environment.

use serde::{Deserialize, Serialize};

use crate::image::Orientation;
use crate::llm::ProviderType;

/// Top-level configuration.
///
/// Loaded from `~/.codebuddy/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: ProviderType,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Ask for a JSON `{answer, image_query}` reply instead of an inline marker.
    #[serde(default = "default_true")]
    pub structured_output: bool,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_true() -> bool {
    true
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            structured_output: true,
        }
    }
}

/// Stock-photo search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_image_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_image_base_url() -> String {
    "https://api.pexels.com/v1".to_string()
}

fn default_image_timeout_secs() -> u64 {
    15
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_image_base_url(),
            orientation: Orientation::default(),
            timeout_secs: default_image_timeout_secs(),
        }
    }
}

/// Web server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sessions untouched for this long are dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Upper bound on live sessions; the least recently used is evicted.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_session_idle_secs() -> u64 {
    3600
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Document export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "CodeBuddy_Answer.pdf".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}
