// ABOUTME: CLI commands for minting, parsing and inspecting temp tokens
// ABOUTME: All work is local; the parent token never leaves the machine

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use colored::*;
use mediakey_cli::render::{format_rows, parsed_rows, TokenReport};
use mediakey_config::PluginSettings;
use mediakey_core::MAX_TOKEN_TTL_SECS;
use mediakey_security::{CapabilityPayload, TempTokenCodec};

#[derive(Args, Debug)]
pub struct MintArgs {
    /// Lifetime in seconds; defaults to MEDIAKEY_TOKEN_TTL_SECS
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_TTL_SECS))]
    pub expires_in: Option<u64>,

    /// Permission string, e.g. "asset.read"
    #[arg(long)]
    pub permissions: Option<String>,

    /// Limit the token to one resource id
    #[arg(long)]
    pub resource: Option<String>,

    /// Limit the token to one folder id
    #[arg(long)]
    pub folder: Option<String>,

    /// Restricted resource id, e.g. "assign:7:42"
    #[arg(long)]
    pub restricted: Option<String>,

    /// Only accept requests from this source IP
    #[arg(long)]
    pub source_ip: Option<String>,

    /// Only accept requests for this host
    #[arg(long)]
    pub host: Option<String>,
}

impl MintArgs {
    fn payload(&self, expires_at: DateTime<Utc>) -> CapabilityPayload {
        let mut payload = CapabilityPayload::expiring_at(expires_at);
        if let Some(permissions) = &self.permissions {
            payload = payload.with_permissions(permissions.as_str());
        }
        if let Some(resource) = &self.resource {
            payload = payload.with_resource_id(resource.as_str());
        }
        if let Some(folder) = &self.folder {
            payload = payload.with_folder_id(folder.as_str());
        }
        if let Some(restricted) = &self.restricted {
            payload = payload.with_restricted_resource_id(restricted.as_str());
        }
        if let Some(source_ip) = &self.source_ip {
            payload = payload.with_source_ip(source_ip.as_str());
        }
        if let Some(host) = &self.host {
            payload = payload.with_host(host.as_str());
        }
        payload
    }
}

pub fn mint_command(settings: &PluginSettings, args: &MintArgs) -> anyhow::Result<()> {
    let parent = settings.parent_token()?;

    let ttl = match args.expires_in {
        // Bounded by the clap range
        Some(secs) => Duration::seconds(secs as i64),
        None => settings.token_ttl(),
    };
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .context("Token expiry is out of range")?;

    let token = TempTokenCodec::new()
        .mint(parent, &args.payload(expires_at))
        .context("Failed to mint temp token")?;

    println!("{}", token);
    eprintln!(
        "{} expires at {}",
        "✓".green().bold(),
        expires_at.to_rfc3339().cyan()
    );
    Ok(())
}

pub fn parse_command(settings: &PluginSettings, token: &str, json: bool) -> anyhow::Result<()> {
    let parsed = TempTokenCodec::new()
        .parse(token, settings.parent_token()?)
        .context("Failed to parse temp token")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    for line in format_rows(&parsed_rows(&parsed)) {
        println!("{}", line);
    }
    Ok(())
}

pub fn inspect_command(settings: &PluginSettings, token: &str, json: bool) -> anyhow::Result<()> {
    let parsed = TempTokenCodec::new()
        .parse(token, settings.parent_token()?)
        .context("Failed to parse temp token")?;
    let payload =
        CapabilityPayload::decode(&parsed.payload).context("Failed to read token payload")?;

    let report = TokenReport::new(parsed, payload, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Temp token".bold().cyan());
    for line in format_rows(&report.rows()) {
        println!("  {}", line);
    }

    if report.expired {
        println!("{}", "✗ Token has expired".red().bold());
    } else {
        println!("{}", "✓ Token is still valid".green().bold());
    }
    Ok(())
}
