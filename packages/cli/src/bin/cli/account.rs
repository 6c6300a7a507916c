// ABOUTME: CLI command for looking up the gallery account behind the parent token
// ABOUTME: Calls the provider's ping endpoint once

use anyhow::Context;
use colored::*;
use mediakey_api::{AccountResolver, GalleryApiClient};
use mediakey_config::PluginSettings;
use mediakey_core::account_id_of;

pub async fn account_command(settings: &PluginSettings) -> anyhow::Result<()> {
    let parent = settings.parent_token()?;
    let client = GalleryApiClient::from_settings(settings);

    let account_id = client
        .resolve_account_id(parent)
        .await
        .with_context(|| format!("Account lookup against {} failed", client.base_url()))?;

    println!("{}", account_id);

    // Minted tokens carry the prefix of the parent token, not the looked-up id
    let prefix = account_id_of(parent);
    if prefix != account_id {
        eprintln!(
            "{} parent token prefix '{}' differs from account id '{}'",
            "⚠".yellow().bold(),
            prefix,
            account_id
        );
    }
    Ok(())
}
