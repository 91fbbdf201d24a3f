//! `skycache`: command-line front end for the local weather cache.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `location` | Add or list cached locations |
//! | `weather` | Add or list daily observations |
//! | `forecast` | Show the coming days for a location |
//! | `import` | Load a forecast batch from JSON |
//! | `reset` | Drop all cached data |
//! | `info` | Show database path, size and row counts |
//! | `config` | Show or edit the configuration file |
//!
//! # Configuration
//!
//! Settings live in `~/.config/skycache/config.toml` (or the platform
//! equivalent, overridable with `SKYCACHE_CONFIG`): preferred `location`,
//! `units`, `db_path` and default output `format`.
//!
//! # Environment Variables
//!
//! - `SKYCACHE_DB`: database file (overridden by `--db`)
//! - `SKYCACHE_CONFIG`: configuration file path
//! - `RUST_LOG`: log filter when neither `--verbose` nor `--quiet` is given

mod cli;
mod commands;
mod config;
mod format;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{
    ForecastArgs, cmd_config, cmd_forecast, cmd_import, cmd_info, cmd_location, cmd_reset,
    cmd_weather, open_store,
};
use crate::config::{Config, resolve_db_path};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let db_path = resolve_db_path(cli.db, &config);
    tracing::debug!("Using database {}", db_path.display());

    match cli.command {
        Commands::Location { action } => cmd_location(&open_store(&db_path)?, action, &config),
        Commands::Weather { action } => cmd_weather(&open_store(&db_path)?, action, &config),
        Commands::Forecast {
            location,
            days,
            units,
        } => {
            let args = ForecastArgs {
                location,
                days,
                units,
            };
            cmd_forecast(&open_store(&db_path)?, args, &config)
        }
        Commands::Import { input } => cmd_import(&open_store(&db_path)?, &input, cli.quiet),
        Commands::Reset { yes } => cmd_reset(&db_path, yes, cli.quiet),
        Commands::Info => cmd_info(&db_path),
        Commands::Config { action } => cmd_config(action, config),
    }
}
