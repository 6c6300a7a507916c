use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
/// `RUST_LOG` wins; otherwise `--verbose` selects debug output for mediakey crates.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,mediakey_security=debug,mediakey_api=debug,mediakey_config=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
