//! Command implementations for the CLI.

mod config;
mod forecast;
mod import;
mod info;
mod location;
mod reset;
mod weather;

use std::path::Path;

use anyhow::{Context, Result};
use skycache_store::Store;

pub use config::cmd_config;
pub use forecast::{ForecastArgs, cmd_forecast};
pub use import::cmd_import;
pub use info::cmd_info;
pub use location::cmd_location;
pub use reset::cmd_reset;
pub use weather::cmd_weather;

/// Open the store at `path` and bring its schema up to the current version.
pub fn open_store(path: &Path) -> Result<Store> {
    let store = Store::open_at(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    if store
        .ensure_schema_version()
        .context("Failed to check schema version")?
    {
        tracing::warn!(
            "Schema version changed; recreated empty tables in {}",
            path.display()
        );
    }
    Ok(store)
}
