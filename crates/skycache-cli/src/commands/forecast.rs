//! Forecast command - the coming days for one location.

use anyhow::{Context, Result};
use skycache_store::{Store, WeatherObservation, WeatherQuery};
use skycache_types::DayBucket;

use crate::config::{Config, Units, resolve_location, resolve_units};
use crate::format::format_forecast_text;

/// Arguments for the forecast command.
pub struct ForecastArgs {
    pub location: Option<String>,
    pub days: u32,
    pub units: Option<Units>,
}

pub fn cmd_forecast(store: &Store, args: ForecastArgs, config: &Config) -> Result<()> {
    let setting = resolve_location(args.location, config).context(
        "No location given. Pass --location or run 'skycache config set location <setting>'",
    )?;
    let metric = resolve_units(args.units, config).is_metric();

    let content = render_forecast(store, &setting, args.days, DayBucket::today(), metric)?;
    print!("{}", content);
    Ok(())
}

fn render_forecast(
    store: &Store,
    setting: &str,
    days: u32,
    today: DayBucket,
    metric: bool,
) -> Result<String> {
    let location = store
        .find_location(setting)?
        .with_context(|| format!("Unknown location '{}'", setting))?;

    let query = WeatherQuery::new()
        .location_id(location.id)
        .from_day(today)
        .before_day(today.offset(i64::from(days)))
        .oldest_first();
    let rows = latest_per_day(store.query_weather(&query)?);
    tracing::debug!("Forecast for '{}': {} days", setting, rows.len());

    Ok(format_forecast_text(&location, &rows, today.date()?, metric))
}

/// Keep the most recently inserted row for each day.
///
/// `rows` must be ordered by date, then id.
fn latest_per_day(rows: impl IntoIterator<Item = WeatherObservation>) -> Vec<WeatherObservation> {
    let mut days: Vec<WeatherObservation> = Vec::new();
    for row in rows {
        match days.last_mut() {
            Some(last) if last.day() == row.day() => *last = row,
            _ => days.push(row),
        }
    }
    days
}
