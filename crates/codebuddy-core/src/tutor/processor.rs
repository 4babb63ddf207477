//! PromptProcessor -- one user prompt in, one user turn and one assistant turn out.
//!
//! Flow per prompt:
//! 1. Reject blank input (nothing is appended)
//! 2. Append the user turn
//! 3. Build the tutor template and call the completion provider
//! 4. Resolve the reply (structured JSON or `[SEARCH_IMAGE: ...]` marker)
//! 5. Look up an illustrative image when a query was produced
//! 6. Append the assistant turn (or an error turn) and record the last answer
//!
//! Completion failures never escape: they become an error turn reading
//! `An error occurred: <message>`, and the session stays usable.

use std::sync::Arc;
use std::time::Instant;

use codebuddy_types::chat::{Turn, TurnImage};
use codebuddy_types::error::ProcessError;
use codebuddy_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use codebuddy_types::tutor::{PromptMode, TurnReport};

use crate::image::{BoxImageSearch, ImageLookup, lookup_image};
use crate::llm::box_provider::BoxLlmProvider;
use crate::session::TutorSession;

use super::prompt::build_tutor_prompt;
use super::reply::{resolve_reply, tutor_reply_output_config};

/// Generation parameters applied to every completion request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub structured_output: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 4096,
            structured_output: true,
        }
    }
}

/// Runs the tutor pipeline against a session.
///
/// Either collaborator may be absent: without a provider every prompt yields
/// an error turn; without an image search, markers are still stripped but no
/// lookup happens.
pub struct PromptProcessor {
    provider: Option<Arc<BoxLlmProvider>>,
    images: Option<Arc<BoxImageSearch>>,
    settings: GenerationSettings,
    /// Env var to mention when no provider is configured.
    missing_key_hint: String,
}

impl PromptProcessor {
    pub fn new(
        provider: Option<Arc<BoxLlmProvider>>,
        images: Option<Arc<BoxImageSearch>>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            images,
            settings,
            missing_key_hint: "GOOGLE_API_KEY".to_string(),
        }
    }

    /// Name the env var shown in the "not configured" error turn.
    pub fn with_missing_key_hint(mut self, env_var: impl Into<String>) -> Self {
        self.missing_key_hint = env_var.into();
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn has_image_search(&self) -> bool {
        self.images.is_some()
    }

    /// The prompt mode actually used: structured only when configured and
    /// the provider advertises support for it.
    pub fn prompt_mode(&self) -> PromptMode {
        let supported = self
            .provider
            .as_ref()
            .is_some_and(|p| p.capabilities().structured_output);
        if self.settings.structured_output && supported {
            PromptMode::Structured
        } else {
            PromptMode::Marker
        }
    }

    /// Process one prompt against `session`.
    ///
    /// On success exactly two turns have been appended: the user turn and an
    /// assistant turn that is either the answer or a surfaced error.
    pub async fn process(
        &self,
        session: &mut TutorSession,
        text: &str,
    ) -> Result<TurnReport, ProcessError> {
        if text.trim().is_empty() {
            return Err(ProcessError::EmptyPrompt);
        }

        let user_turn = Turn::user(text);
        session.transcript.push(user_turn.clone())?;

        let started = Instant::now();
        let mode = self.prompt_mode();

        let (assistant_turn, image_query, attempted) = match self.generate(text, mode).await {
            Ok(raw) => {
                let reply = resolve_reply(&raw, mode);
                if reply.answer.trim().is_empty() {
                    let turn = Turn::error("An error occurred: the model returned an empty answer");
                    (turn, reply.image_query, false)
                } else {
                    let (image, notices, attempted) =
                        self.illustrate(reply.image_query.as_deref()).await;
                    let turn = Turn::answer(reply.answer)
                        .with_image(image)
                        .with_notices(notices);
                    (turn, reply.image_query, attempted)
                }
            }
            Err(err) => {
                tracing::warn!(session_id = %session.id, error = %err, "completion failed");
                (Turn::error(format!("An error occurred: {err}")), None, false)
            }
        };

        session.transcript.push(assistant_turn.clone())?;
        if !assistant_turn.is_error() {
            session.last_answer = Some(assistant_turn.content.clone());
        }

        tracing::info!(
            session_id = %session.id,
            mode = ?mode,
            image_query = image_query.as_deref().unwrap_or(""),
            error = assistant_turn.is_error(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prompt processed"
        );

        Ok(TurnReport {
            user_turn,
            assistant_turn,
            image_query,
            image_lookup_attempted: attempted,
        })
    }

    /// Call the completion provider and return its raw text.
    async fn generate(&self, text: &str, mode: PromptMode) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or_else(|| LlmError::NotConfigured {
            env_var: self.missing_key_hint.clone(),
        })?;

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: build_tutor_prompt(text, mode),
            }],
            system: None,
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            output_config: (mode == PromptMode::Structured).then(tutor_reply_output_config),
        };

        tracing::debug!(provider = provider.name(), model = %request.model, "requesting completion");
        let response = provider.complete(&request).await?;
        Ok(response.content)
    }

    /// Look up an image for `query`. Returns the attachment, any notices, and
    /// whether a lookup was attempted.
    async fn illustrate(&self, query: Option<&str>) -> (Option<TurnImage>, Vec<String>, bool) {
        let (Some(query), Some(images)) = (query, self.images.as_ref()) else {
            return (None, Vec::new(), false);
        };

        match lookup_image(images, query).await {
            ImageLookup::Found(hit) => (Some(TurnImage::for_query(hit.url, query)), Vec::new(), true),
            ImageLookup::NotFound => (None, Vec::new(), true),
            ImageLookup::Failed(notice) => (None, vec![notice], true),
        }
    }
}
