//! Reset command - drop and recreate the cache tables.

use std::path::Path;

use anyhow::{Context, Result};
use skycache_store::Store;

pub fn cmd_reset(path: &Path, yes: bool, quiet: bool) -> Result<()> {
    if !yes {
        anyhow::bail!(
            "This deletes every cached location and observation in {}. Re-run with --yes to confirm",
            path.display()
        );
    }

    let store = Store::new(path);
    store
        .reset()
        .with_context(|| format!("Failed to reset database: {}", path.display()))?;
    store.close();

    if !quiet {
        println!("Reset {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycache_store::fixtures::insert_north_pole_location;

    #[test]
    fn test_reset_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");

        let err = cmd_reset(&path, false, true).unwrap_err();
        assert!(err.to_string().contains("--yes"));
        assert!(!path.exists());
    }

    #[test]
    fn test_reset_clears_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");
        {
            let store = Store::open_at(&path).unwrap();
            insert_north_pole_location(&store).unwrap();
        }

        cmd_reset(&path, true, true).unwrap();

        let store = Store::open_at(&path).unwrap();
        assert_eq!(store.count_locations().unwrap(), 0);
    }
}
