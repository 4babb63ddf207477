//! Application state shared by the CLI and the HTTP server.
//!
//! Wires config, the prompt processor (with its provider and image search),
//! the session registry and the page renderer. Everything is behind `Arc` so
//! axum can clone the state per request.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use codebuddy_core::session::SessionRegistry;
use codebuddy_core::tutor::processor::PromptProcessor;
use codebuddy_infra::config::{load_app_config, resolve_data_dir};
use codebuddy_infra::secret::EnvSecretProvider;
use codebuddy_infra::startup::{Startup, StartupIssue, build_processor};
use codebuddy_types::config::AppConfig;

use crate::http::page::{PageInfo, PageRenderer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<PromptProcessor>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<AppConfig>,
    pub issues: Arc<Vec<StartupIssue>>,
    pub pages: Arc<PageRenderer>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config from the data directory and wire services from the environment.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_app_config(&data_dir).await;
        let startup = build_processor(&config, &EnvSecretProvider::new());
        Self::from_parts(config, startup, data_dir)
    }

    pub fn from_parts(config: AppConfig, startup: Startup, data_dir: PathBuf) -> anyhow::Result<Self> {
        let pages = PageRenderer::new(PageInfo {
            provider: config.llm.provider.to_string(),
            model: config.llm.model.clone(),
        })?;

        Ok(Self {
            processor: Arc::new(startup.processor),
            sessions: Arc::new(SessionRegistry::with_limits(
                Duration::from_secs(config.server.session_idle_secs),
                config.server.max_sessions,
            )),
            config: Arc::new(config),
            issues: Arc::new(startup.issues),
            pages: Arc::new(pages),
            data_dir,
        })
    }

    /// Messages of startup errors, for banners.
    pub fn error_messages(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|issue| issue.is_error())
            .map(|issue| issue.message.clone())
            .collect()
    }
}
