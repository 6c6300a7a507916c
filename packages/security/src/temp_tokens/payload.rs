// ABOUTME: Capability payload carried inside a temp token
// ABOUTME: Expiry timestamp followed by optional `!`-tagged scoping fields in a fixed order

use super::{TokenError, TokenResult};
use chrono::{DateTime, Datelike, SecondsFormat, Timelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Introduces every scoping field in the payload
pub const FIELD_SEPARATOR: char = '!';

/// Last year the four-digit expiry format can carry
const MAX_EXPIRY_YEAR: i32 = 9999;

/// Scoping field tags, declared in payload order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeTag {
    Permissions,
    ResourceId,
    FolderId,
    RestrictedResourceId,
    SourceIp,
    Host,
}

impl ScopeTag {
    pub const ORDER: [ScopeTag; 6] = [
        ScopeTag::Permissions,
        ScopeTag::ResourceId,
        ScopeTag::FolderId,
        ScopeTag::RestrictedResourceId,
        ScopeTag::SourceIp,
        ScopeTag::Host,
    ];

    pub fn code(self) -> char {
        match self {
            ScopeTag::Permissions => 'p',
            ScopeTag::ResourceId => 'r',
            ScopeTag::FolderId => 'f',
            ScopeTag::RestrictedResourceId => 'd',
            ScopeTag::SourceIp => 'i',
            ScopeTag::Host => 'h',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ORDER.into_iter().find(|tag| tag.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScopeTag::Permissions => "permissions",
            ScopeTag::ResourceId => "resource id",
            ScopeTag::FolderId => "folder id",
            ScopeTag::RestrictedResourceId => "restricted resource id",
            ScopeTag::SourceIp => "source ip",
            ScopeTag::Host => "host",
        }
    }
}

/// Format an expiry as UTC with exactly seven fractional digits and a `Z` suffix.
///
/// The seven digits count 100 ns ticks: coarser inputs are zero-padded on the
/// right and finer ones truncated.
pub fn format_expiry<Tz: TimeZone>(expiry: &DateTime<Tz>) -> String {
    let utc = expiry.with_timezone(&Utc);
    let ticks = (utc.nanosecond() % 1_000_000_000) / 100;
    format!("{}.{:07}Z", utc.format("%Y-%m-%dT%H:%M:%S"), ticks)
}

fn parse_expiry(raw: &str) -> TokenResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TokenError::InvalidPayload(format!("invalid expiry '{}': {}", raw, e)))
}

/// Drop precision the payload cannot carry so encode/decode is lossless
fn truncate_to_ticks(utc: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = (utc.nanosecond() / 100) * 100;
    utc.with_nanosecond(nanos).unwrap_or(utc)
}

/// Decrypted contents of a temp token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityPayload {
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl CapabilityPayload {
    /// Payload with only an expiry; scoping fields are added with the `with_*` methods
    pub fn expiring_at<Tz: TimeZone>(expiry: DateTime<Tz>) -> Self {
        Self {
            expires_at: truncate_to_ticks(expiry.with_timezone(&Utc)),
            permissions: None,
            resource_id: None,
            folder_id: None,
            restricted_resource_id: None,
            source_ip: None,
            host: None,
        }
    }

    pub fn with_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = Some(permissions.into());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn with_restricted_resource_id(mut self, restricted_resource_id: impl Into<String>) -> Self {
        self.restricted_resource_id = Some(restricted_resource_id.into());
        self
    }

    pub fn with_source_ip(mut self, source_ip: impl Into<String>) -> Self {
        self.source_ip = Some(source_ip.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn field(&self, tag: ScopeTag) -> Option<&str> {
        match tag {
            ScopeTag::Permissions => self.permissions.as_deref(),
            ScopeTag::ResourceId => self.resource_id.as_deref(),
            ScopeTag::FolderId => self.folder_id.as_deref(),
            ScopeTag::RestrictedResourceId => self.restricted_resource_id.as_deref(),
            ScopeTag::SourceIp => self.source_ip.as_deref(),
            ScopeTag::Host => self.host.as_deref(),
        }
    }

    fn field_mut(&mut self, tag: ScopeTag) -> &mut Option<String> {
        match tag {
            ScopeTag::Permissions => &mut self.permissions,
            ScopeTag::ResourceId => &mut self.resource_id,
            ScopeTag::FolderId => &mut self.folder_id,
            ScopeTag::RestrictedResourceId => &mut self.restricted_resource_id,
            ScopeTag::SourceIp => &mut self.source_ip,
            ScopeTag::Host => &mut self.host,
        }
    }

    /// Present scoping fields in payload order
    pub fn fields(&self) -> impl Iterator<Item = (ScopeTag, &str)> + '_ {
        ScopeTag::ORDER
            .into_iter()
            .filter_map(move |tag| self.field(tag).map(|value| (tag, value)))
    }

    /// Reject expiries the payload cannot carry and values that would smuggle
    /// extra tagged fields into it
    pub fn validate(&self) -> TokenResult<()> {
        if !(0..=MAX_EXPIRY_YEAR).contains(&self.expires_at.year()) {
            return Err(TokenError::InvalidArgument(format!(
                "expiry {} is outside years 0000-{}",
                self.expires_at_rfc3339(),
                MAX_EXPIRY_YEAR
            )));
        }

        for (tag, value) in self.fields() {
            if value.contains(FIELD_SEPARATOR) {
                return Err(TokenError::InvalidArgument(format!(
                    "{} must not contain '{}'",
                    tag.label(),
                    FIELD_SEPARATOR
                )));
            }
        }
        Ok(())
    }

    /// Plaintext form: `<expiry>[!p..][!r..][!f..][!d..][!i..][!h..]`
    pub fn encode(&self) -> String {
        let mut encoded = format_expiry(&self.expires_at);
        for (tag, value) in self.fields() {
            encoded.push(FIELD_SEPARATOR);
            encoded.push(tag.code());
            encoded.push_str(value);
        }
        encoded
    }

    /// Split a decrypted payload back into its fields.
    ///
    /// Tags must be known, appear at most once and follow payload order.
    pub fn decode(raw: &str) -> TokenResult<Self> {
        let mut segments = raw.split(FIELD_SEPARATOR);
        let expiry = segments.next().unwrap_or_default();
        let mut payload = Self::expiring_at(parse_expiry(expiry)?);
        let mut last_tag: Option<ScopeTag> = None;

        for segment in segments {
            let mut chars = segment.chars();
            let code = chars
                .next()
                .ok_or_else(|| TokenError::InvalidPayload("empty field".to_string()))?;
            let tag = ScopeTag::from_code(code).ok_or_else(|| {
                TokenError::InvalidPayload(format!("unknown field tag '{}'", code))
            })?;

            if last_tag.is_some_and(|last| tag <= last) {
                return Err(TokenError::InvalidPayload(format!(
                    "field '{}' is repeated or out of order",
                    code
                )));
            }

            *payload.field_mut(tag) = Some(chars.as_str().to_string());
            last_tag = Some(tag);
        }

        Ok(payload)
    }

    /// Expired once `now` reaches the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn expires_at_rfc3339(&self) -> String {
        self.expires_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl fmt::Display for CapabilityPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CapabilityPayload {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
