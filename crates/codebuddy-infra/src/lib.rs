//! Infrastructure layer for CodeBuddy.
//!
//! Adapters behind the ports defined in `codebuddy-core`: the
//! OpenAI-compatible LLM provider (Gemini by default), Pexels image search,
//! answer export to HTML and PDF, config loading and environment secrets.

pub mod config;
pub mod export;
pub mod image;
pub mod llm;
pub mod secret;
pub mod startup;
