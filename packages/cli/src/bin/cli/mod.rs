pub mod account;
pub mod tokens;

use anyhow::Context;
use mediakey_config::PluginSettings;

/// Settings from the environment (and `.env`), with the command line token
/// taking precedence over both configured tokens
pub fn load_settings(parent_token: Option<String>) -> anyhow::Result<PluginSettings> {
    let settings = PluginSettings::from_env().context("Failed to load settings")?;

    Ok(match parent_token.filter(|token| !token.is_empty()) {
        Some(token) => settings.with_course_api_token(token),
        None => settings,
    })
}
