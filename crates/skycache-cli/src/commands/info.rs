//! Info command implementation.

use std::path::Path;

use anyhow::Result;

use super::open_store;

pub fn cmd_info(path: &Path) -> Result<()> {
    println!("Database path: {}", path.display());

    if !path.exists() {
        println!("Database does not exist yet. Add a location or import a forecast to create it.");
        return Ok(());
    }

    let size_kb = std::fs::metadata(path)?.len() / 1024;
    println!("Database size: {} KB", size_kb);

    let store = open_store(path)?;
    println!("Schema version: {}", store.schema_version()?);
    println!("Locations: {}", store.count_locations()?);
    println!("Weather observations: {}", store.count_weather(None)?);
    Ok(())
}
