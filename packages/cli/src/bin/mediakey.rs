use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::tokens::MintArgs;

#[derive(Parser)]
#[command(name = "mediakey")]
#[command(about = "Mint and inspect temp tokens for the media-gallery upload widget")]
#[command(version)]
struct Cli {
    /// Parent API token; overrides MEDIAKEY_COURSE_API_TOKEN and MEDIAKEY_API_TOKEN
    #[arg(long, global = true)]
    parent_token: Option<String>,

    /// Enable debug logging for mediakey crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a temp token from the parent token
    Mint(MintArgs),
    /// Decrypt a temp token and print its raw payload
    Parse {
        token: String,
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    /// Decrypt a temp token and show each scoping field and its expiry status
    Inspect {
        token: String,
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    /// Look up the gallery account that owns the parent token
    Account,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    mediakey_cli::logging::init_tracing(cli.verbose);

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let settings = cli::load_settings(cli.parent_token)?;

    match cli.command {
        Commands::Mint(args) => cli::tokens::mint_command(&settings, &args),
        Commands::Parse { token, json } => cli::tokens::parse_command(&settings, &token, json),
        Commands::Inspect { token, json } => {
            cli::tokens::inspect_command(&settings, &token, json)
        }
        Commands::Account => cli::account::account_command(&settings).await,
    }
}
