//! Business logic and provider trait definitions for CodeBuddy.
//!
//! This crate defines the "ports" (LLM provider and image search traits) that
//! the infrastructure layer implements, plus the tutor prompt pipeline and the
//! in-memory session model. It depends only on `codebuddy-types` -- never on
//! `codebuddy-infra` or any HTTP crate.

pub mod image;
pub mod llm;
pub mod session;
pub mod tutor;
