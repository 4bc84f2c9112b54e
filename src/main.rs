//! Target Select - pick a target JVM from a discovery server
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tsel_app::config::{default_config_path, init_config_file, SettingsOverrides};
use tsel_core::logging;

/// Target Select - pick a target JVM from a discovery server
#[derive(Parser, Debug)]
#[command(name = "tsel")]
#[command(about = "Pick a target JVM from a discovery server", long_about = None)]
struct Args {
    /// Discovery server base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Bearer token for the server (overrides the config file)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Narrow card (a third of the terminal width)
    #[arg(long)]
    compact: bool,

    /// Disable the periodic full refresh
    #[arg(long)]
    no_auto_refresh: bool,

    /// Run in headless mode (NDJSON output, no TUI)
    #[arg(long)]
    headless: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);

    if args.init_config {
        let path = config_path.ok_or_else(|| eyre!("No config directory on this platform"))?;
        if init_config_file(&path)? {
            eprintln!("Wrote default config to {}", path.display());
        } else {
            eprintln!("Config already exists at {}", path.display());
        }
        return Ok(());
    }

    // Logs go to a file; the terminal belongs to the UI or to NDJSON output
    logging::init()?;

    let overrides = SettingsOverrides {
        url: args.url,
        auth_token: args.token,
        compact: args.compact,
        no_auto_refresh: args.no_auto_refresh,
    };
    let settings = target_select::resolve_settings(config_path.as_deref(), &overrides);

    let result = if args.headless {
        target_select::run_headless(settings, config_path, overrides).await
    } else {
        target_select::run_tui(settings, config_path, overrides).await
    };

    if let Err(ref e) = result {
        tracing::error!("Application error: {:?}", e);
    }
    tracing::info!("Target Select exiting");
    Ok(result?)
}
