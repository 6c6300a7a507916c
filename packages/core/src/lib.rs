// ABOUTME: Core types, constants and provider conventions for mediakey
// ABOUTME: Foundational package shared by the token, config, api and cli packages

pub mod constants;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{GalleryRef, ScopeError, SubmissionScope};

// Re-export constants
pub use constants::{
    DEFAULT_API_BASE_URL, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, TEMP_TOKEN_MARKER,
};

// Re-export utilities
pub use utils::{account_id_of, fingerprint_of};
