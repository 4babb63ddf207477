//! Secret lookup.

pub mod env;

pub use env::{EnvSecretProvider, resolve_secret};
