//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use codebuddy_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities,
};

/// Trait for LLM provider backends (Gemini, OpenAI, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition) for `complete`.
/// Implementations live in codebuddy-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Default model used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// What this provider supports (structured output, vision, limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
