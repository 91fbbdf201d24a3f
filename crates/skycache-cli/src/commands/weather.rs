//! Weather command - add and list daily observations.

use anyhow::{Context, Result};
use skycache_store::{NewObservation, Store, WeatherObservation, WeatherQuery};
use skycache_types::{DailyWeather, DayBucket};

use crate::cli::{OutputFormat, WeatherAction};
use crate::config::{Config, resolve_format};
use crate::format::{as_json, format_weather_text};

pub fn cmd_weather(store: &Store, action: WeatherAction, config: &Config) -> Result<()> {
    match action {
        WeatherAction::Add {
            location,
            date,
            desc,
            condition,
            min,
            max,
            humidity,
            pressure,
            wind,
            degrees,
        } => {
            let weather = DailyWeather {
                date: parse_timestamp(&date)?,
                short_desc: desc,
                weather_id: condition,
                min_temp: min,
                max_temp: max,
                humidity,
                pressure,
                wind_speed: wind,
                degrees,
            };
            add_weather(store, &location, weather)
        }
        WeatherAction::List {
            location,
            day,
            limit,
            format,
        } => {
            let mut query = WeatherQuery::new().oldest_first();
            if let Some(location) = &location {
                query = query.location_setting(location);
            }
            if let Some(day) = &day {
                query = query.on_day(DayBucket::parse(day)?);
            }
            if limit > 0 {
                query = query.limit(limit);
            }
            list_weather(store, &query, resolve_format(format, config), config)
        }
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an epoch-seconds timestamp kept as given.
fn parse_timestamp(s: &str) -> Result<i64> {
    if let Ok(timestamp) = s.trim().parse::<i64>() {
        return Ok(timestamp);
    }
    let day = DayBucket::parse(s)
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD or epoch seconds", s))?;
    Ok(day.start())
}

fn add_weather(store: &Store, location_setting: &str, weather: DailyWeather) -> Result<()> {
    let location = store.find_location(location_setting)?.with_context(|| {
        format!(
            "Unknown location '{}'. Add it first with 'skycache location add'",
            location_setting
        )
    })?;

    let day = weather.day();
    let id = store
        .insert_weather(&NewObservation::new(location.id, weather))
        .context("Failed to add weather")?;
    println!(
        "Added weather for {} on {} with id {}",
        location.location_setting, day, id
    );
    Ok(())
}

fn list_weather(
    store: &Store,
    query: &WeatherQuery,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let content = match format {
        OutputFormat::Csv => store.export_weather_csv(query)?,
        OutputFormat::Json => {
            let rows: Vec<WeatherObservation> = store.query_weather(query)?.collect();
            as_json(&rows)?
        }
        OutputFormat::Text => {
            let rows: Vec<WeatherObservation> = store.query_weather(query)?.collect();
            format_weather_text(&rows, config.units.is_metric())
        }
    };
    print!("{}", content);
    Ok(())
}
