// ABOUTME: Request-scoped session for embedding the upload widget in one submission
// ABOUTME: Memoizes the gallery account id per session and mints scoped upload tokens

use crate::error::ApiResult;
use crate::resolver::AccountResolver;
use chrono::{DateTime, Duration, Utc};
use mediakey_config::PluginSettings;
use mediakey_core::{GalleryRef, SubmissionScope};
use mediakey_security::{CapabilityPayload, TempTokenCodec, TokenError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Everything one request needs to mint widget tokens for a submission.
///
/// The account id is looked up at most once per session; a failed lookup is
/// not cached and is retried on the next call.
pub struct SubmissionSession {
    resolver: Arc<dyn AccountResolver>,
    codec: TempTokenCodec,
    parent_token: String,
    token_ttl: Duration,
    account_id: OnceCell<String>,
}

impl SubmissionSession {
    pub fn new(settings: &PluginSettings, resolver: Arc<dyn AccountResolver>) -> ApiResult<Self> {
        Ok(Self {
            resolver,
            codec: TempTokenCodec::new(),
            parent_token: settings.parent_token()?.to_string(),
            token_ttl: settings.token_ttl(),
            account_id: OnceCell::new(),
        })
    }

    /// Gallery account id owning the parent token
    pub async fn account_id(&self) -> ApiResult<&str> {
        let account_id = self
            .account_id
            .get_or_try_init(|| async {
                debug!("Resolving gallery account id");
                self.resolver
                    .resolve_account_id(&self.parent_token)
                    .await
                    .inspect_err(|e| warn!(error = %e, "Gallery account id lookup failed"))
            })
            .await?;

        Ok(account_id.as_str())
    }

    /// Temp token for the upload widget, restricted to one submission and
    /// valid for the configured TTL from `now`
    pub fn upload_token(&self, scope: &SubmissionScope, now: DateTime<Utc>) -> ApiResult<String> {
        let expires_at = now.checked_add_signed(self.token_ttl).ok_or_else(|| {
            TokenError::InvalidArgument(format!(
                "token lifetime of {}s overflows the expiry",
                self.token_ttl.num_seconds()
            ))
        })?;
        let payload = CapabilityPayload::expiring_at(expires_at)
            .with_restricted_resource_id(scope.restricted_resource_id());

        Ok(self.codec.mint(&self.parent_token, &payload)?)
    }

    /// Gallery the widget boots with for this submission
    pub async fn gallery_ref(&self, scope: SubmissionScope, template: &str) -> ApiResult<GalleryRef> {
        let account_id = self.account_id().await?;
        Ok(GalleryRef::for_submission(scope, account_id, template)?)
    }
}
