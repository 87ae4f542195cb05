// API key resolution
//
// Order: explicit config value, then the ANTHROPIC_API_KEY environment
// variable. Keys are format-checked before use.

use thiserror::Error;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const API_KEY_PREFIX: &str = "sk-ant-";
const MIN_API_KEY_LEN: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid API key format. Claude API keys should start with 'sk-ant-'")]
    BadPrefix,

    #[error("API key appears too short. Please check and try again.")]
    TooShort,
}

pub struct CredentialManager;

impl CredentialManager {
    /// Check the key looks like a Claude API key
    pub fn validate_api_key(key: &str) -> Result<(), CredentialError> {
        if !key.starts_with(API_KEY_PREFIX) {
            return Err(CredentialError::BadPrefix);
        }
        if key.len() < MIN_API_KEY_LEN {
            return Err(CredentialError::TooShort);
        }
        Ok(())
    }

    /// Pick the configured key, falling back to the environment.
    /// Blank values count as unset.
    pub fn resolve_api_key(
        configured: Option<&str>,
        env_value: Option<String>,
    ) -> Result<Option<String>, CredentialError> {
        let key = configured
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| {
                env_value
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
            });

        match key {
            Some(key) => {
                Self::validate_api_key(&key)?;
                log::info!("API key configured (length: {})", key.len());
                Ok(Some(key))
            }
            None => {
                log::warn!("No API key configured; AI playlists will be unavailable");
                Ok(None)
            }
        }
    }

    /// `resolve_api_key` against the real process environment
    pub fn resolve_from_env(configured: Option<&str>) -> Result<Option<String>, CredentialError> {
        Self::resolve_api_key(configured, std::env::var(API_KEY_ENV).ok())
    }
}
