// ABOUTME: Error types for gallery API calls and submission sessions
// ABOUTME: Wraps HTTP, provider, configuration, scoping and token errors

use mediakey_config::ConfigError;
use mediakey_core::ScopeError;
use mediakey_security::TokenError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Request URLs carry the API token, so these are stripped of their URL
    #[error("HTTP request error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Gallery API error: {0}")]
    Provider(String),

    #[error("Gallery API response did not include an account id")]
    MissingAccountId,

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scope: {0}")]
    Scope(#[from] ScopeError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err.without_url())
    }
}
