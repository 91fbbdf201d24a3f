//! Field-by-field record validation.
//!
//! Expected values are collected into a [`FieldMap`] keyed by column name
//! and compared against anything implementing [`Record`]. Values are
//! compared in their string form, since the underlying SQLite columns are
//! loosely typed: `65`, `65.0` and `"65"` all match.
//!
//! ```
//! use skycache_store::fixtures::{build_weather_fixture, north_pole_location};
//! use skycache_store::{Record, Store, WeatherQuery, validate_single};
//!
//! let store = Store::open_in_memory()?;
//! let location_id = store.insert_location(&north_pole_location())?;
//! let fixture = build_weather_fixture(location_id, 1_419_033_600);
//! store.insert_weather(&fixture)?;
//!
//! let rows = store.query_weather(&WeatherQuery::new().location_id(location_id))?;
//! validate_single(&fixture.to_fields(), rows)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use skycache_types::{DailyWeather, LocationInfo};

use crate::models::{Location, NewObservation, WeatherObservation};
use crate::schema::{location, weather};

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Real(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// Column name to value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Drop a column from the expectation.
    pub fn remove(&mut self, column: &str) -> Option<FieldValue> {
        self.fields.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Something with column-addressable fields.
pub trait Record {
    /// Columns this record carries.
    fn columns(&self) -> &'static [&'static str];

    /// Value of one column, or `None` if the record has no such column.
    fn field(&self, column: &str) -> Option<FieldValue>;

    /// All fields as a map.
    fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        for column in self.columns() {
            if let Some(value) = self.field(column) {
                map.insert(*column, value);
            }
        }
        map
    }
}

fn location_field(info: &LocationInfo, column: &str) -> Option<FieldValue> {
    match column {
        location::CITY_NAME => Some(info.city_name.as_str().into()),
        location::COORD_LAT => Some(info.latitude.into()),
        location::COORD_LONG => Some(info.longitude.into()),
        location::LOCATION_SETTING => Some(info.location_setting.as_str().into()),
        _ => None,
    }
}

fn weather_field(location_id: i64, w: &DailyWeather, column: &str) -> Option<FieldValue> {
    match column {
        weather::LOCATION_ID => Some(location_id.into()),
        weather::DATE => Some(w.date.into()),
        weather::SHORT_DESC => Some(w.short_desc.as_str().into()),
        weather::WEATHER_ID => Some(w.weather_id.into()),
        weather::MIN_TEMP => Some(w.min_temp.into()),
        weather::MAX_TEMP => Some(w.max_temp.into()),
        weather::HUMIDITY => Some(w.humidity.into()),
        weather::PRESSURE => Some(w.pressure.into()),
        weather::WIND_SPEED => Some(w.wind_speed.into()),
        weather::DEGREES => Some(w.degrees.into()),
        _ => None,
    }
}

impl Record for LocationInfo {
    fn columns(&self) -> &'static [&'static str] {
        &location::COLUMNS[1..]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        location_field(self, column)
    }
}

impl Record for Location {
    fn columns(&self) -> &'static [&'static str] {
        location::COLUMNS
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        if column == location::ID {
            return Some(self.id.into());
        }
        location_field(&self.to_info(), column)
    }
}

impl Record for NewObservation {
    fn columns(&self) -> &'static [&'static str] {
        &weather::COLUMNS[1..]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        weather_field(self.location_id, &self.weather, column)
    }
}

impl Record for WeatherObservation {
    fn columns(&self) -> &'static [&'static str] {
        weather::COLUMNS
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        if column == weather::ID {
            return Some(self.id.into());
        }
        weather_field(self.location_id, &self.to_daily(), column)
    }
}

/// Validation failures, reported with field-level detail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The record has no such column.
    #[error("Column '{field}' not found")]
    FieldNotFound { field: String },

    /// The column exists but holds a different value.
    #[error("Value '{actual}' in column '{field}' did not match the expected value '{expected}'")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// The result sequence was empty.
    #[error("No records returned")]
    NoRecords,

    /// The result sequence held more than one record.
    #[error("Expected exactly one record, found {count}")]
    UnexpectedRecords { count: usize },
}

/// Check every expected field against `actual`.
///
/// Fields of `actual` that are not in `expected` are ignored.
pub fn validate_record<R: Record + ?Sized>(
    expected: &FieldMap,
    actual: &R,
) -> Result<(), ValidationError> {
    for (column, expected_value) in expected.iter() {
        let actual_value = actual
            .field(column)
            .ok_or_else(|| ValidationError::FieldNotFound {
                field: column.to_string(),
            })?;

        let expected_str = expected_value.to_string();
        let actual_str = actual_value.to_string();
        if expected_str != actual_str {
            return Err(ValidationError::FieldMismatch {
                field: column.to_string(),
                expected: expected_str,
                actual: actual_str,
            });
        }
    }
    Ok(())
}

/// Check that `records` holds exactly one record and that it matches.
pub fn validate_single<R, I>(expected: &FieldMap, records: I) -> Result<(), ValidationError>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(ValidationError::NoRecords)?;

    let extra = records.count();
    if extra > 0 {
        return Err(ValidationError::UnexpectedRecords { count: extra + 1 });
    }

    validate_record(expected, &first)
}
