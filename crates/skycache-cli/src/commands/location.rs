//! Location command - add and list cached locations.

use anyhow::{Context, Result};
use skycache_store::{Location, LocationQuery, Store};
use skycache_types::LocationInfo;

use crate::cli::{LocationAction, OutputFormat};
use crate::config::{Config, resolve_format};
use crate::format::{as_json, format_locations_csv, format_locations_text};

pub fn cmd_location(store: &Store, action: LocationAction, config: &Config) -> Result<()> {
    match action {
        LocationAction::Add {
            setting,
            city,
            lat,
            lon,
        } => add_location(store, LocationInfo::new(setting, city, lat, lon)),
        LocationAction::List { setting, format } => {
            list_locations(store, setting.as_deref(), resolve_format(format, config))
        }
    }
}

fn add_location(store: &Store, info: LocationInfo) -> Result<()> {
    let id = store
        .insert_location(&info)
        .with_context(|| format!("Failed to add location '{}'", info.location_setting))?;
    println!(
        "Added location {} ({}) with id {}",
        info.location_setting, info.city_name, id
    );
    Ok(())
}

fn list_locations(store: &Store, setting: Option<&str>, format: OutputFormat) -> Result<()> {
    let mut query = LocationQuery::new();
    if let Some(setting) = setting {
        query = query.location_setting(setting);
    }

    let mut locations: Vec<Location> = store.query_locations(&query)?.collect();
    locations.sort_by_key(|l| l.id);

    let content = match format {
        OutputFormat::Text => format_locations_text(&locations),
        OutputFormat::Json => as_json(&locations)?,
        OutputFormat::Csv => format_locations_csv(&locations),
    };
    print!("{}", content);
    Ok(())
}
