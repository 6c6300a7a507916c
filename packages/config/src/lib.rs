// ABOUTME: Configuration for mediakey: parent tokens, temp token lifetime and API location
// ABOUTME: Environment variable names plus typed settings loaded from them

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, PluginSettings};
