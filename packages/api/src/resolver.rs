use crate::error::ApiResult;
use async_trait::async_trait;

/// Looks up the gallery account id that owns an API token
#[async_trait]
pub trait AccountResolver: Send + Sync {
    async fn resolve_account_id(&self, api_token: &str) -> ApiResult<String>;
}
