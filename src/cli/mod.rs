//! CLI entry point for resttoken.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigLayer, TokenConfig};
use crate::error::Result;

/// resttoken CLI
#[derive(Parser, Debug)]
#[command(
    name = "resttoken",
    version,
    about = "Fetch service tokens over HTTP Basic auth"
)]
pub struct Cli {
    /// Log refresh activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request a token once and print it
    Fetch(ConfigArgs),
    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Configuration sources shared by every command.
///
/// Flags override `RESTTOKEN_*` environment variables, which override the
/// config file.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Config file path (defaults to ~/.resttoken/config.toml)
    #[arg(short, long, env = "RESTTOKEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Token endpoint URL
    #[arg(long)]
    pub token_url: Option<String>,

    /// URL of the service the token is issued for
    #[arg(long)]
    pub service_url: Option<String>,

    /// Basic auth username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ConfigArgs {
    /// Layer holding only the values given as flags.
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            token_url: self.token_url.clone(),
            service_url: self.service_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Merge file, environment, and flags into a validated config.
    pub fn resolve(&self) -> Result<TokenConfig> {
        TokenConfig::load_layers(self.config.as_deref())?
            .overlay(self.layer())
            .into_config()
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "resttoken=debug" } else { "resttoken=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Render a config for display with the password redacted.
pub fn render_config(config: &TokenConfig) -> String {
    format!(
        "token_url = {:?}\nservice_url = {:?}\nusername = {:?}\npassword = \"<redacted>\"\ntimeout_secs = {}\n",
        config.token_url(),
        config.service_url(),
        config.username(),
        config.timeout().as_secs(),
    )
}
