// ABOUTME: Type definitions for temp token parsing results
// ABOUTME: Account id, parent fingerprint and the raw decrypted payload

use serde::{Deserialize, Serialize};

/// A temp token split into its visible prefix and decrypted payload.
/// The payload is the raw `!`-delimited string; see `CapabilityPayload` for its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTempToken {
    pub account_id: String,
    pub last4: String,
    pub payload: String,
}

impl ParsedTempToken {
    pub fn new(account_id: String, last4: String, payload: String) -> Self {
        Self {
            account_id,
            last4,
            payload,
        }
    }
}
