// ABOUTME: Temp token security for mediakey
// ABOUTME: Salted key derivation, AES-256-CBC payload encryption, and capability token minting

pub mod encryption;
pub mod temp_tokens;

// Re-export main types for convenience
pub use encryption::{CipherError, KeyDerivationCipher};
pub use temp_tokens::{
    CapabilityPayload, ParsedTempToken, ScopeTag, TempTokenCodec, TokenError, TokenResult,
};
