use crate::constants::{
    MEDIAKEY_API_BASE_URL, MEDIAKEY_API_TOKEN, MEDIAKEY_COURSE_API_TOKEN, MEDIAKEY_TOKEN_TTL_SECS,
};
use chrono::Duration;
use mediakey_core::{
    fingerprint_of, DEFAULT_API_BASE_URL, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS,
};
use std::env;
use std::fmt;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid token TTL '{0}': expected 1 to 315360000 seconds")]
    InvalidTtl(String),

    #[error("Invalid API base URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("No API token configured: set MEDIAKEY_COURSE_API_TOKEN or MEDIAKEY_API_TOKEN")]
    MissingToken,
}

/// Plugin settings: which parent token to mint from, and for how long
#[derive(Clone, PartialEq)]
pub struct PluginSettings {
    pub api_token: Option<String>,
    pub course_api_token: Option<String>,
    pub token_ttl_secs: u64,
    pub api_base_url: Url,
}

impl PluginSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token_ttl_secs = match read(MEDIAKEY_TOKEN_TTL_SECS) {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let base_url = read(MEDIAKEY_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(&base_url).map_err(|source| ConfigError::InvalidUrl {
            value: base_url.clone(),
            source,
        })?;

        let settings = Self {
            api_token: read(MEDIAKEY_API_TOKEN),
            course_api_token: read(MEDIAKEY_COURSE_API_TOKEN),
            token_ttl_secs,
            api_base_url,
        };

        debug!(
            ttl_secs = settings.token_ttl_secs,
            api_base_url = %settings.api_base_url,
            course_override = settings.course_api_token.is_some(),
            "Loaded plugin settings"
        );

        Ok(settings)
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_course_api_token(mut self, token: impl Into<String>) -> Self {
        self.course_api_token = Some(token.into());
        self
    }

    /// Course token when one is set, otherwise the global token
    pub fn parent_token(&self) -> Result<&str, ConfigError> {
        self.course_api_token
            .as_deref()
            .or(self.api_token.as_deref())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    pub fn token_ttl(&self) -> Duration {
        // Only the public field can carry a value above the cap
        Duration::seconds(self.token_ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64)
    }
}

fn parse_ttl(raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 && secs <= MAX_TOKEN_TTL_SECS => Ok(secs),
        _ => Err(ConfigError::InvalidTtl(raw.to_string())),
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            course_api_token: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .expect("default API base URL is valid"),
        }
    }
}

// Parent tokens are credentials; only their fingerprints are printed
impl fmt::Debug for PluginSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| {
            token
                .as_deref()
                .map(|t| format!("****{}", fingerprint_of(t)))
        };

        f.debug_struct("PluginSettings")
            .field("api_token", &redact(&self.api_token))
            .field("course_api_token", &redact(&self.course_api_token))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("api_base_url", &self.api_base_url.as_str())
            .finish()
    }
}
