// ABOUTME: Provider conventions shared by every mediakey package
// ABOUTME: Token markers, fingerprint width, scoping prefixes and API defaults

/// Marker between the account id and the parent fingerprint of a temp token.
/// The digit is the token format version; other provider formats use other digits.
pub const TEMP_TOKEN_MARKER: &str = "i3";

/// Separator between the numeric account id and the rest of a provider token
pub const ACCOUNT_ID_SEPARATOR: char = 'i';

/// Number of trailing parent-token characters exposed in a temp token
pub const FINGERPRINT_LEN: usize = 4;

/// Default lifetime of a temp token handed to the upload widget (2 hours)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 2 * 60 * 60;

/// Default base URL of the media-gallery API
pub const DEFAULT_API_BASE_URL: &str = "https://api.cincopa.com";

/// Prefix of restricted resource ids scoped to one assignment submission
pub const SUBMISSION_SCOPE_PREFIX: &str = "assign";

/// Prefix of gallery ids that resolve through a restricted resource id
pub const GALLERY_RRID_PREFIX: &str = "rrid";

/// Longest accepted temp token lifetime (10 years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
