//! Environment variable secret provider.
//!
//! Secrets (LLM and image API keys) only ever come from the process
//! environment. Values are wrapped in [`SecretString`] as soon as they are read
//! so they cannot end up in `Debug` output or logs.

use secrecy::SecretString;

/// Read-only secret provider over environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    /// Look up a single variable. Unset, empty, and non-Unicode values are absent.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        match std::env::var(key) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            // Present but not valid Unicode: unusable as an API key.
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }

    /// First variable in `keys` that is set, with the name it was found under.
    pub fn first_of<'a>(&self, keys: &[&'a str]) -> Option<(&'a str, SecretString)> {
        keys.iter()
            .find_map(|key| self.get(key).map(|secret| (*key, secret)))
    }
}

/// Resolve the first non-empty variable among `keys`.
pub fn resolve_secret(keys: &[&str]) -> Option<SecretString> {
    EnvSecretProvider::new().first_of(keys).map(|(_, secret)| secret)
}
