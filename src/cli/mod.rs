//! Command-line interface parsing and handling
//!
//! This module parses the few ambient flags, prepares logging, configuration,
//! credentials and the runtime, then hands the console to the menu.

pub mod menu;

use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::inference::InferenceClient;
use crate::auth::CredentialResolver;
use crate::cli::menu::run_menu;
use crate::core::config::data::path_display;
use crate::core::config::Config;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "foundry-compare")]
#[command(about = "Compare hosted chat models and chat with one of them")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (rustc ",
    env!("VERGEN_RUSTC_SEMVER"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
))]
#[command(
    long_about = "Foundry Compare is a console demo for a hosted chat-completion endpoint. \
It sends one prompt to every configured model and reports each answer with token usage \
and timing, or opens a streaming chat with a single model.\n\n\
Authentication:\n\
  AZURE_INFERENCE_CREDENTIAL   Endpoint key or token (checked first)\n\
  System keyring               Service 'foundry-compare', user 'endpoint'\n\n\
Configuration:\n\
  A TOML file with endpoint_url, api_version, models, system_prompt and a\n\
  [generation] table. Built-in defaults are used when the file is absent.\n\n\
Logging:\n\
  RUST_LOG                     Diagnostic filter (default: warn), written to stderr"
)]
pub struct Args {
    /// Path to the configuration file (defaults to the per-user config directory)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append diagnostics to this file instead of stderr
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

pub fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    result.map_err(|err| -> Box<dyn Error> { err })
}

/// The file `Config::load` reads: the `--config` override, else the per-user default.
pub fn effective_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(Config::get_config_path)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config_path = effective_config_path(args.config.as_deref());
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let credential = CredentialResolver::new().resolve();
    info!(
        endpoint = %config.endpoint_url,
        models = config.models.len(),
        credential = credential
            .as_ref()
            .map(|c| c.source().to_string())
            .unwrap_or_else(|| "none".to_string()),
        config_path = %config_path
            .map(path_display)
            .unwrap_or_else(|| "<none>".to_string()),
        "Starting demo"
    );

    let client = InferenceClient::new(&config, credential);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    run_menu(&client, &config, &mut input, &mut out).await?;
    Ok(())
}
