//! Ready-made field sets for exercising the store.
//!
//! The values describe a comical, fictitious weather scenario at the North
//! Pole. They are complete and valid, so they can be inserted as-is.

use skycache_types::{DailyWeather, LocationInfo};

use crate::error::Result;
use crate::models::NewObservation;
use crate::store::Store;

/// Location setting of the North Pole fixture.
pub const TEST_LOCATION: &str = "99705";

/// December 20th, 2014, 00:00:00 UTC.
pub const TEST_DATE: i64 = 1_419_033_600;

/// Build a complete location field set.
pub fn build_location_fixture(
    location_setting: &str,
    city_name: &str,
    latitude: f64,
    longitude: f64,
) -> LocationInfo {
    LocationInfo::new(location_setting, city_name, latitude, longitude)
}

/// The North Pole, Alaska.
pub fn north_pole_location() -> LocationInfo {
    build_location_fixture(TEST_LOCATION, "North Pole", 64.7488, -147.353)
}

/// Build a complete weather field set pointing at `location_id`.
///
/// `location_id` must name an existing location for the insert to succeed.
pub fn build_weather_fixture(location_id: i64, date: i64) -> NewObservation {
    NewObservation::new(
        location_id,
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
        },
    )
}

/// Insert the North Pole fixture and return its row id.
pub fn insert_north_pole_location(store: &Store) -> Result<i64> {
    store.insert_location(&north_pole_location())
}
