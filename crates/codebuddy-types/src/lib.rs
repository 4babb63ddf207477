//! Shared domain types for CodeBuddy.
//!
//! This crate contains the core domain types used across the CodeBuddy tutor:
//! transcript turns, LLM request/response shapes, image search hits, structured
//! tutor replies, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, schemars.

pub mod chat;
pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod tutor;
