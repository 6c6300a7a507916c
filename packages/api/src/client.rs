// ABOUTME: HTTP client for the media-gallery API
// ABOUTME: Only the account lookup (ping) is used; the rest of the API stays external

use crate::error::{ApiError, ApiResult};
use crate::resolver::AccountResolver;
use async_trait::async_trait;
use mediakey_config::PluginSettings;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

const PING_PATH: &str = "v2/ping.json";

/// Ping response; the provider reports the owning account as `accid`
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub accid: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PingResponse {
    /// Account id as text; the provider may send it as a string or a number
    pub fn account_id(&self) -> Option<String> {
        match self.accid.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// HTTP client for the media-gallery API
#[derive(Debug, Clone)]
pub struct GalleryApiClient {
    client: Client,
    base_url: Url,
}

impl GalleryApiClient {
    pub fn new(mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_settings(settings: &PluginSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check an API token and fetch the account that owns it
    pub async fn ping(&self, api_token: &str) -> ApiResult<PingResponse> {
        let url = self.base_url.join(PING_PATH)?;
        debug!(endpoint = %url, "Pinging gallery API");

        let response = self
            .client
            .get(url)
            .query(&[("api_token", api_token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Provider(format!("ping returned HTTP {}", status)));
        }

        let body = response.json::<PingResponse>().await?;
        if body.success == Some(false) {
            return Err(ApiError::Provider(
                body.message
                    .unwrap_or_else(|| "ping was rejected".to_string()),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl AccountResolver for GalleryApiClient {
    async fn resolve_account_id(&self, api_token: &str) -> ApiResult<String> {
        self.ping(api_token)
            .await?
            .account_id()
            .ok_or(ApiError::MissingAccountId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ping(body: Value) -> PingResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_account_id_from_string() {
        assert_eq!(
            ping(json!({ "success": true, "accid": "12345" })).account_id(),
            Some("12345".to_string())
        );
    }

    #[test]
    fn test_account_id_from_number() {
        assert_eq!(
            ping(json!({ "accid": 12345 })).account_id(),
            Some("12345".to_string())
        );
    }

    #[test]
    fn test_account_id_missing_or_empty() {
        assert_eq!(ping(json!({ "success": true })).account_id(), None);
        assert_eq!(ping(json!({ "accid": "" })).account_id(), None);
        assert_eq!(ping(json!({ "accid": null })).account_id(), None);
    }

    #[test]
    fn test_from_settings_uses_base_url() {
        let settings = PluginSettings::default();
        let client = GalleryApiClient::from_settings(&settings);
        assert_eq!(client.base_url().as_str(), "https://api.cincopa.com/");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = GalleryApiClient::new(Url::parse("https://proxy.example/api").unwrap());
        assert_eq!(client.base_url().as_str(), "https://proxy.example/api/");
        assert_eq!(
            client.base_url().join(PING_PATH).unwrap().as_str(),
            "https://proxy.example/api/v2/ping.json"
        );

        let client = GalleryApiClient::new(Url::parse("https://proxy.example/api/").unwrap());
        assert_eq!(client.base_url().as_str(), "https://proxy.example/api/");
    }
}
