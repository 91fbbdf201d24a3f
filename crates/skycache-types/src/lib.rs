//! Platform-agnostic types for the skycache weather cache.
//!
//! This crate provides the value types shared by the store and the CLI:
//! location and daily-weather field sets, plus the day-bucket helpers
//! that define "same day" for date lookups.
//!
//! # Example
//!
//! ```
//! use skycache_types::{DailyWeather, LocationInfo, same_day};
//!
//! let north_pole = LocationInfo::new("99705", "North Pole", 64.7488, -147.353);
//! assert!(north_pole.validate().is_ok());
//! assert!(same_day(1_419_033_600, 1_419_033_600 + 3_600));
//! ```

pub mod day;
pub mod error;
pub mod types;

pub use day::{DayBucket, SECONDS_PER_DAY, same_day};
pub use error::{ParseError, ParseResult};
pub use types::{DailyWeather, LocationInfo};

#[cfg(test)]
mod tests {
    use super::*;

    fn asteroids(date: i64) -> DailyWeather {
        DailyWeather {
            date,
            short_desc: "Asteroids".to_string(),
            weather_id: 321,
            min_temp: 65.0,
            max_temp: 75.0,
            humidity: 1.2,
            pressure: 1.3,
            wind_speed: 5.5,
            degrees: 1.1,
        }
    }

    // --- LocationInfo tests ---

    #[test]
    fn test_location_info_new() {
        let location = LocationInfo::new("99705", "North Pole", 64.7488, -147.353);
        assert_eq!(location.location_setting, "99705");
        assert_eq!(location.city_name, "North Pole");
        assert!((location.latitude - 64.7488).abs() < f64::EPSILON);
        assert!((location.longitude + 147.353).abs() < f64::EPSILON);
    }

    #[test]
    fn test_location_info_rejects_blank_city() {
        let location = LocationInfo::new("99705", "  ", 64.7488, -147.353);
        let err = location.validate().unwrap_err();
        assert!(err.to_string().contains("city_name"));
    }

    #[test]
    fn test_location_info_rejects_bad_coordinates() {
        assert!(LocationInfo::new("a", "b", 90.5, 0.0).validate().is_err());
        assert!(LocationInfo::new("a", "b", 0.0, -180.5).validate().is_err());
        assert!(LocationInfo::new("a", "b", f64::NAN, 0.0).validate().is_err());
        assert!(LocationInfo::new("a", "b", -90.0, 180.0).validate().is_ok());
    }

    // --- DailyWeather tests ---

    #[test]
    fn test_daily_weather_day() {
        let weather = asteroids(1_419_033_600 + 50_000);
        assert_eq!(weather.day().start(), 1_419_033_600);
    }

    #[test]
    fn test_daily_weather_validate() {
        assert!(asteroids(0).validate().is_ok());

        let mut blank = asteroids(0);
        blank.short_desc = String::new();
        assert!(blank.validate().is_err());

        let mut infinite = asteroids(0);
        infinite.wind_speed = f64::INFINITY;
        let err = infinite.validate().unwrap_err();
        assert!(err.to_string().contains("wind_speed"));
    }

    // --- Serialization tests ---

    #[test]
    fn test_location_info_deserialization() {
        let json = r#"{"location_setting":"99705","city_name":"North Pole","latitude":64.7488,"longitude":-147.353}"#;
        let location: LocationInfo = serde_json::from_str(json).unwrap();
        assert_eq!(location, LocationInfo::new("99705", "North Pole", 64.7488, -147.353));
    }

    #[test]
    fn test_daily_weather_serialization() {
        let json = serde_json::to_string(&asteroids(1_419_033_600)).unwrap();
        assert!(json.contains("\"date\":1419033600"));
        assert!(json.contains("\"short_desc\":\"Asteroids\""));
        assert!(json.contains("\"weather_id\":321"));
    }

    // --- ParseError tests ---

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidData("test message".to_string());
        assert_eq!(err.to_string(), "Invalid data: test message");
    }
}
