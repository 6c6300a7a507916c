// ABOUTME: Plain-text and JSON views of parsed temp tokens
// ABOUTME: Produces label/value rows the binary prints with colors

use chrono::{DateTime, Utc};
use mediakey_security::{CapabilityPayload, ParsedTempToken};
use serde::Serialize;

/// A parsed token with its payload split into fields
#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    pub account_id: String,
    pub last4: String,
    pub payload: CapabilityPayload,
    pub expired: bool,
}

impl TokenReport {
    pub fn new(parsed: ParsedTempToken, payload: CapabilityPayload, now: DateTime<Utc>) -> Self {
        let expired = payload.is_expired_at(now);
        Self {
            account_id: parsed.account_id,
            last4: parsed.last4,
            payload,
            expired,
        }
    }

    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("account id".to_string(), self.account_id.clone()),
            ("parent fingerprint".to_string(), format!("****{}", self.last4)),
            ("expires at".to_string(), self.payload.expires_at_rfc3339()),
            (
                "status".to_string(),
                if self.expired { "expired" } else { "valid" }.to_string(),
            ),
        ];

        rows.extend(
            self.payload
                .fields()
                .map(|(tag, value)| (tag.label().to_string(), value.to_string())),
        );
        rows
    }
}

/// Rows for `parse`, which leaves the payload unsplit
pub fn parsed_rows(parsed: &ParsedTempToken) -> Vec<(String, String)> {
    vec![
        ("account id".to_string(), parsed.account_id.clone()),
        ("parent fingerprint".to_string(), format!("****{}", parsed.last4)),
        ("payload".to_string(), parsed.payload.clone()),
    ]
}

/// Pad labels to a common width
pub fn format_rows(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = width))
        .collect()
}
