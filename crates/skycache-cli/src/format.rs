//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use serde::Serialize;
use skycache_store::{Location, WeatherObservation};
use time::Date;
use time::macros::format_description;

/// Format a temperature for display.
///
/// Values are stored in Celsius. With `metric == false` they are converted
/// to Fahrenheit. No decimals are shown.
#[must_use]
pub fn format_temperature(temperature: f64, metric: bool) -> String {
    let value = if metric {
        temperature
    } else {
        temperature * 9.0 / 5.0 + 32.0
    };
    format!("{:.0}°", value)
}

/// Human-friendly label for `date` relative to `today`.
///
/// - the same day: `"Today, December 20"`
/// - the next day: `"Tomorrow"`
/// - within the coming week: the weekday name, e.g. `"Wednesday"`
/// - anything else: `"Sat Dec 20"`
#[must_use]
pub fn friendly_day(date: Date, today: Date) -> String {
    let delta = (date - today).whole_days();

    if delta == 0 {
        let month_day = format_description!("[month repr:long] [day]");
        let label = date
            .format(&month_day)
            .unwrap_or_else(|_| date.to_string());
        format!("Today, {}", label)
    } else if delta == 1 {
        "Tomorrow".to_string()
    } else if delta < 7 {
        date.weekday().to_string()
    } else {
        let short = format_description!("[weekday repr:short] [month repr:short] [day]");
        date.format(&short).unwrap_or_else(|_| date.to_string())
    }
}

/// Serialize a value as pretty JSON with a trailing newline.
pub fn as_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Escape a CSV field if it contains special characters.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn day_label(timestamp: i64) -> String {
    skycache_types::DayBucket::of(timestamp).to_string()
}

pub fn format_locations_text(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No locations cached.\n".to_string();
    }

    let mut output = format!(
        "{:>4}  {:<12} {:<24} {:>10} {:>11}\n",
        "ID", "Setting", "City", "Latitude", "Longitude"
    );
    output.push_str(&format!("{}\n", "-".repeat(65)));
    for location in locations {
        output.push_str(&format!(
            "{:>4}  {:<12} {:<24} {:>10.4} {:>11.4}\n",
            location.id,
            location.location_setting,
            location.city_name,
            location.latitude,
            location.longitude
        ));
    }
    output
}

pub fn format_locations_csv(locations: &[Location]) -> String {
    let mut output = "_id,city_name,coord_lat,coord_long,location_setting\n".to_string();
    for location in locations {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            location.id,
            csv_escape(&location.city_name),
            location.latitude,
            location.longitude,
            csv_escape(&location.location_setting)
        ));
    }
    output
}

pub fn format_weather_text(rows: &[WeatherObservation], metric: bool) -> String {
    if rows.is_empty() {
        return "No weather observations found.\n".to_string();
    }

    let mut output = format!(
        "{:>4}  {:>8}  {:<10}  {:<16} {:>6} {:>6} {:>8} {:>8} {:>6} {:>5}\n",
        "ID", "Location", "Day", "Conditions", "High", "Low", "Humidity", "Pressure", "Wind", "Dir"
    );
    output.push_str(&format!("{}\n", "-".repeat(92)));
    for row in rows {
        output.push_str(&format!(
            "{:>4}  {:>8}  {:<10}  {:<16} {:>6} {:>6} {:>8.1} {:>8.1} {:>6.1} {:>5.0}\n",
            row.id,
            row.location_id,
            day_label(row.date),
            row.short_desc,
            format_temperature(row.max_temp, metric),
            format_temperature(row.min_temp, metric),
            row.humidity,
            row.pressure,
            row.wind_speed,
            row.degrees
        ));
    }
    output
}

/// Render forecast rows, one line per day.
pub fn format_forecast_text(
    location: &Location,
    rows: &[WeatherObservation],
    today: Date,
    metric: bool,
) -> String {
    let mut output = format!(
        "{} ({})\n",
        location.city_name, location.location_setting
    );

    if rows.is_empty() {
        output.push_str("  No forecast cached for the coming days.\n");
        return output;
    }

    for row in rows {
        let label = row
            .day()
            .date()
            .map(|date| friendly_day(date, today))
            .unwrap_or_else(|_| day_label(row.date));
        output.push_str(&format!(
            "  {:<22} {:<16} {:>5} / {:>5}\n",
            label,
            row.short_desc,
            format_temperature(row.max_temp, metric),
            format_temperature(row.min_temp, metric)
        ));
    }
    output
}
