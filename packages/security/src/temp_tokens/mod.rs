// ABOUTME: Stateless temp tokens derived from a long-lived parent API token
// ABOUTME: Mints `<accid>i3<last4><blob>` tokens and parses them back with the parent secret

mod payload;
mod types;

pub use payload::{format_expiry, CapabilityPayload, ScopeTag, FIELD_SEPARATOR};
pub use types::ParsedTempToken;

use crate::encryption::{CipherError, KeyDerivationCipher};
use chrono::{DateTime, Utc};
use mediakey_core::{account_id_of, fingerprint_of, TEMP_TOKEN_MARKER};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

pub type TokenResult<T> = Result<T, TokenError>;

/// Digits, the `i3` marker, four fingerprint characters, then the blob
static TEMP_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)i3(.{4})(.+)$").expect("temp token pattern is a valid regex")
});

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid temp token format")]
    InvalidFormat,

    #[error("Decryption failed: {0}")]
    DecryptionFailed(#[source] CipherError),

    #[error("Failed to encrypt payload: {0}")]
    Encryption(#[source] CipherError),

    #[error("Invalid capability payload: {0}")]
    InvalidPayload(String),

    #[error("Temp token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Mints and parses temp tokens.
///
/// No state is kept between calls: a token is valid exactly when it decrypts
/// under the parent secret and its expiry has not passed.
#[derive(Debug, Clone, Default)]
pub struct TempTokenCodec {
    cipher: KeyDerivationCipher,
}

impl TempTokenCodec {
    pub fn new() -> Self {
        Self {
            cipher: KeyDerivationCipher::new(),
        }
    }

    /// Mint a temp token carrying `payload`, encrypted under `parent_secret`
    pub fn mint(&self, parent_secret: &str, payload: &CapabilityPayload) -> TokenResult<String> {
        if parent_secret.is_empty() {
            return Err(TokenError::InvalidArgument(
                "empty parent token not allowed".to_string(),
            ));
        }
        payload.validate()?;

        let account_id = account_id_of(parent_secret);
        let last4 = fingerprint_of(parent_secret);

        let blob = self
            .cipher
            .encrypt(parent_secret.as_bytes(), payload.encode().as_bytes())
            .map_err(TokenError::Encryption)?;

        debug!(
            account_id = %account_id,
            fingerprint = %last4,
            expires_at = %payload.expires_at,
            "Minted temp token"
        );

        Ok(format!("{}{}{}{}", account_id, TEMP_TOKEN_MARKER, last4, blob))
    }

    /// Split a temp token and decrypt its payload with `parent_secret`.
    ///
    /// The payload comes back raw; use [`CapabilityPayload::decode`] or
    /// [`verify`](Self::verify) to read individual fields.
    pub fn parse(&self, token: &str, parent_secret: &str) -> TokenResult<ParsedTempToken> {
        let captures = TEMP_TOKEN_PATTERN
            .captures(token)
            .ok_or(TokenError::InvalidFormat)?;

        let account_id = &captures[1];
        let last4 = &captures[2];
        let blob = &captures[3];

        let plaintext = self
            .cipher
            .decrypt(parent_secret.as_bytes(), blob)
            .map_err(TokenError::DecryptionFailed)?;

        // Non-UTF-8 output means the wrong key got past the padding check
        let payload = String::from_utf8(plaintext)
            .map_err(|_| TokenError::DecryptionFailed(CipherError::DecryptionFailed))?;

        debug!(account_id = %account_id, fingerprint = %last4, "Parsed temp token");

        Ok(ParsedTempToken::new(
            account_id.to_string(),
            last4.to_string(),
            payload,
        ))
    }

    /// Parse a temp token, split its payload and reject it once expired at `now`
    pub fn verify(
        &self,
        token: &str,
        parent_secret: &str,
        now: DateTime<Utc>,
    ) -> TokenResult<CapabilityPayload> {
        let parsed = self.parse(token, parent_secret)?;
        let payload = CapabilityPayload::decode(&parsed.payload)?;

        if payload.is_expired_at(now) {
            return Err(TokenError::Expired(payload.expires_at));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    const PARENT: &str = "12345ixyz789";

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_mint_format_contract() {
        let codec = TempTokenCodec::new();
        let payload =
            CapabilityPayload::expiring_at(new_year()).with_restricted_resource_id("assign:7:42");

        let token = codec.mint(PARENT, &payload).unwrap();

        let shape = Regex::new(r"^12345i3z789[A-Za-z0-9_-]+$").unwrap();
        assert!(shape.is_match(&token), "unexpected token shape: {token}");

        let parsed = codec.parse(&token, PARENT).unwrap();
        assert_eq!(parsed.account_id, "12345");
        assert_eq!(parsed.last4, "z789");
        assert_eq!(parsed.payload, "2024-01-01T00:00:00.0000000Z!dassign:7:42");
    }

    #[test]
    fn test_mint_permissions_only() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year()).with_permissions("read");

        let token = codec.mint(PARENT, &payload).unwrap();
        let parsed = codec.parse(&token, PARENT).unwrap();

        assert_eq!(parsed.payload, "2024-01-01T00:00:00.0000000Z!pread");
    }

    #[test]
    fn test_mint_empty_parent_fails() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year());

        assert!(matches!(
            codec.mint("", &payload),
            Err(TokenError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mint_rejects_field_injection() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year()).with_host("evil!passet.*");

        assert!(matches!(
            codec.mint(PARENT, &payload),
            Err(TokenError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mint_tokens_differ() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year());

        let token1 = codec.mint(PARENT, &payload).unwrap();
        let token2 = codec.mint(PARENT, &payload).unwrap();
        assert_ne!(token1, token2);
        assert_eq!(token1[..11], token2[..11]);
    }

    #[test]
    fn test_parse_invalid_format() {
        let codec = TempTokenCodec::new();

        for token in ["not-a-token", "", "12345i3z78", "12345i3z789", "abci3z789blob", "12345x3z789blob"] {
            assert!(
                matches!(codec.parse(token, PARENT), Err(TokenError::InvalidFormat)),
                "expected InvalidFormat for {token:?}"
            );
        }
    }

    #[test]
    fn test_parse_wrong_secret_never_yields_payload() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year()).with_permissions("read");
        let expected = payload.encode();

        for _ in 0..32 {
            let token = codec.mint(PARENT, &payload).unwrap();
            match codec.parse(&token, "12345iother") {
                Err(TokenError::DecryptionFailed(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
                Ok(parsed) => assert_ne!(parsed.payload, expected),
            }
        }
    }

    #[test]
    fn test_parse_garbage_blob_is_decryption_failure() {
        let codec = TempTokenCodec::new();

        // Fits the pattern, but the blob is too short to hold a salt and IV
        let result = codec.parse("12345i3z789AAAA", PARENT);
        assert!(matches!(
            result,
            Err(TokenError::DecryptionFailed(CipherError::MalformedInput(_)))
        ));
    }

    #[test]
    fn test_parse_flipped_blob_byte_never_yields_payload() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year())
            .with_permissions("asset.upload")
            .with_restricted_resource_id("assign:7:42");
        let expected = payload.encode();

        let token = codec.mint(PARENT, &payload).unwrap();
        let (prefix, blob) = token.split_at("12345i3z789".len());
        let blob = URL_SAFE_NO_PAD.decode(blob).unwrap();

        let mut failures = 0;
        for i in 0..blob.len() {
            let mut tampered = blob.clone();
            tampered[i] ^= 0x01;
            let tampered_token = format!("{}{}", prefix, URL_SAFE_NO_PAD.encode(&tampered));

            match codec.parse(&tampered_token, PARENT) {
                Err(TokenError::DecryptionFailed(_)) => failures += 1,
                Err(other) => panic!("unexpected error at byte {i}: {other}"),
                Ok(parsed) => assert_ne!(parsed.payload, expected, "byte {i} flip went unnoticed"),
            }
        }

        // IV flips only alter the first plaintext block; salt and ciphertext flips break padding
        assert!(
            failures >= blob.len() / 2,
            "only {failures}/{} flipped tokens failed to parse",
            blob.len()
        );
    }

    #[test]
    fn test_verify_returns_fields() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year())
            .with_permissions("asset.upload")
            .with_restricted_resource_id("assign:7:42");

        let token = codec.mint(PARENT, &payload).unwrap();
        let verified = codec
            .verify(&token, PARENT, new_year() - Duration::minutes(5))
            .unwrap();

        assert_eq!(verified, payload);
    }

    #[test]
    fn test_verify_rejects_expired() {
        let codec = TempTokenCodec::new();
        let payload = CapabilityPayload::expiring_at(new_year());
        let token = codec.mint(PARENT, &payload).unwrap();

        let result = codec.verify(&token, PARENT, new_year() + Duration::seconds(1));
        assert!(matches!(result, Err(TokenError::Expired(at)) if at == new_year()));
    }

    #[test]
    fn test_codec_is_shareable_across_threads() {
        let codec = std::sync::Arc::new(TempTokenCodec::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let codec = codec.clone();
                std::thread::spawn(move || {
                    let payload = CapabilityPayload::expiring_at(new_year())
                        .with_resource_id(format!("R{i}"));
                    let token = codec.mint(PARENT, &payload).unwrap();
                    codec.parse(&token, PARENT).unwrap().payload
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!("2024-01-01T00:00:00.0000000Z!rR{i}")
            );
        }
    }
}
