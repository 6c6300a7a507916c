// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across mediakey

// Parent Token Configuration
pub const MEDIAKEY_API_TOKEN: &str = "MEDIAKEY_API_TOKEN";
pub const MEDIAKEY_COURSE_API_TOKEN: &str = "MEDIAKEY_COURSE_API_TOKEN";

// Temp Token Configuration
pub const MEDIAKEY_TOKEN_TTL_SECS: &str = "MEDIAKEY_TOKEN_TTL_SECS";

// Gallery API Configuration
pub const MEDIAKEY_API_BASE_URL: &str = "MEDIAKEY_API_BASE_URL";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
