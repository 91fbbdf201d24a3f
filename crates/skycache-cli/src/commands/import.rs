//! Import command - load a forecast batch from JSON.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use skycache_store::{ForecastBatch, ImportResult, Store};

pub fn cmd_import(store: &Store, input: &Path, quiet: bool) -> Result<()> {
    let data = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read file: {}", input.display()))?
    };

    let result = import_batch(store, &data)?;

    if !quiet {
        println!("Import complete:");
        println!(
            "  Location id: {}{}",
            result.location_id,
            if result.location_created { " (new)" } else { "" }
        );
        println!("  Days inserted: {}", result.inserted);
    }
    Ok(())
}

fn import_batch(store: &Store, data: &str) -> Result<ImportResult> {
    let batch = ForecastBatch::from_json(data).context("Invalid forecast batch")?;
    let result = store
        .import_forecast(&batch)
        .with_context(|| format!("Failed to import '{}'", batch.location.location_setting))?;
    Ok(result)
}
