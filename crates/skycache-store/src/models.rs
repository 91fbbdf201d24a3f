//! Data models for stored data.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use skycache_types::{DailyWeather, DayBucket, LocationInfo};

/// A location stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Database row ID.
    pub id: i64,
    /// Canonical lookup key (unique).
    pub location_setting: String,
    /// Human-readable city name.
    pub city_name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Strip the row id, leaving the insertable field set.
    pub fn to_info(&self) -> LocationInfo {
        LocationInfo {
            location_setting: self.location_setting.clone(),
            city_name: self.city_name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Columns: `_id, city_name, coord_lat, coord_long, location_setting`.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            city_name: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            location_setting: row.get(4)?,
        })
    }
}

/// A weather observation stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Database row ID.
    pub id: i64,
    /// Row ID of the owning location.
    pub location_id: i64,
    /// Observation time in Unix epoch seconds.
    pub date: i64,
    /// Short condition text.
    pub short_desc: String,
    /// Provider condition code.
    pub weather_id: i32,
    /// Minimum temperature.
    pub min_temp: f64,
    /// Maximum temperature.
    pub max_temp: f64,
    /// Relative humidity.
    pub humidity: f64,
    /// Atmospheric pressure.
    pub pressure: f64,
    /// Wind speed.
    pub wind_speed: f64,
    /// Wind direction in degrees.
    pub degrees: f64,
}

impl WeatherObservation {
    /// The calendar day of this observation.
    pub fn day(&self) -> DayBucket {
        DayBucket::of(self.date)
    }

    /// Convert to the location-independent daily weather values.
    pub fn to_daily(&self) -> DailyWeather {
        DailyWeather {
            date: self.date,
            short_desc: self.short_desc.clone(),
            weather_id: self.weather_id,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.wind_speed,
            degrees: self.degrees,
        }
    }

    /// Columns in `schema::weather::COLUMNS` order.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            location_id: row.get(1)?,
            date: row.get(2)?,
            short_desc: row.get(3)?,
            weather_id: row.get(4)?,
            min_temp: row.get(5)?,
            max_temp: row.get(6)?,
            humidity: row.get(7)?,
            pressure: row.get(8)?,
            wind_speed: row.get(9)?,
            degrees: row.get(10)?,
        })
    }
}

/// A weather observation waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
    /// Row ID of the location this observation belongs to.
    pub location_id: i64,
    /// The measurements.
    #[serde(flatten)]
    pub weather: DailyWeather,
}

impl NewObservation {
    /// Attach daily weather to a location row.
    pub fn new(location_id: i64, weather: DailyWeather) -> Self {
        Self {
            location_id,
            weather,
        }
    }
}

/// One ingestion unit: a location and the days fetched for it.
///
/// This is the shape the remote-ingestion side hands to the cache, keyed
/// by `location.location_setting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBatch {
    /// The place the forecast is for.
    pub location: LocationInfo,
    /// Daily observations, in any order.
    #[serde(default)]
    pub days: Vec<DailyWeather>,
}

impl ForecastBatch {
    /// Parse a batch from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Result of importing a [`ForecastBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Row ID of the location the days were attached to.
    pub location_id: i64,
    /// Whether the location row was created by this import.
    pub location_created: bool,
    /// Number of weather rows inserted.
    pub inserted: usize,
}
