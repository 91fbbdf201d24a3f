//! Core value types for cached weather data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::day::DayBucket;
use crate::error::{ParseError, ParseResult};

/// A geographic place, as supplied before it is assigned a row id.
///
/// `location_setting` is the canonical lookup key (a postal code or a
/// provider-specific slug) and must be unique across the cache.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationInfo {
    /// Canonical lookup key for this place.
    pub location_setting: String,
    /// Human-readable city name.
    pub city_name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LocationInfo {
    /// Create a new location field set.
    pub fn new(
        location_setting: impl Into<String>,
        city_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            location_setting: location_setting.into(),
            city_name: city_name.into(),
            latitude,
            longitude,
        }
    }

    /// Check that every field carries a usable value.
    ///
    /// ```
    /// use skycache_types::LocationInfo;
    ///
    /// assert!(LocationInfo::new("99705", "North Pole", 64.7488, -147.353).validate().is_ok());
    /// assert!(LocationInfo::new("", "Nowhere", 0.0, 0.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> ParseResult<()> {
        if self.location_setting.trim().is_empty() {
            return Err(ParseError::InvalidData(
                "location_setting must not be empty".to_string(),
            ));
        }
        if self.city_name.trim().is_empty() {
            return Err(ParseError::InvalidData(
                "city_name must not be empty".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ParseError::InvalidData(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ParseError::InvalidData(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// One day's weather measurements for a location.
///
/// Temperatures are kept in whatever unit ingestion produced; nothing in
/// the cache converts them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyWeather {
    /// Observation time in Unix epoch seconds.
    pub date: i64,
    /// Short condition text, e.g. "Clear".
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
    /// Wind direction in meteorological degrees.
    pub degrees: f64,
}

impl DailyWeather {
    /// The calendar day this observation belongs to.
    #[must_use]
    pub fn day(&self) -> DayBucket {
        DayBucket::of(self.date)
    }

    /// Check that the description is present and all measurements are finite.
    pub fn validate(&self) -> ParseResult<()> {
        if self.short_desc.trim().is_empty() {
            return Err(ParseError::InvalidData(
                "short_desc must not be empty".to_string(),
            ));
        }

        let measurements = [
            ("min_temp", self.min_temp),
            ("max_temp", self.max_temp),
            ("humidity", self.humidity),
            ("pressure", self.pressure),
            ("wind_speed", self.wind_speed),
            ("degrees", self.degrees),
        ];
        for (name, value) in measurements {
            if !value.is_finite() {
                return Err(ParseError::InvalidData(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
