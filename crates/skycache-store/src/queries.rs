//! Query builders for locations and weather observations.
//!
//! Both [`LocationQuery`] and [`WeatherQuery`] follow the builder pattern.
//! An empty query matches every row. Result order is unspecified unless a
//! sort is requested explicitly.
//!
//! # Example
//!
//! ```
//! use skycache_store::{Store, WeatherQuery};
//! use skycache_types::DayBucket;
//!
//! let store = Store::open_in_memory()?;
//!
//! // Everything cached for one postal code on one day
//! let query = WeatherQuery::new()
//!     .location_setting("99705")
//!     .on_day(DayBucket::parse("2014-12-20")?);
//!
//! let rows: Vec<_> = store.query_weather(&query)?.collect();
//! assert!(rows.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rusqlite::ToSql;
use time::OffsetDateTime;

use skycache_types::DayBucket;

type Params = Vec<Box<dyn ToSql>>;

fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

fn push_pagination(sql: &mut String, limit: Option<u32>, offset: Option<u32>) {
    match (limit, offset) {
        (Some(limit), _) => sql.push_str(&format!(" LIMIT {}", limit)),
        // SQLite only accepts OFFSET after a LIMIT clause
        (None, Some(_)) => sql.push_str(" LIMIT -1"),
        (None, None) => {}
    }

    if let Some(offset) = offset {
        sql.push_str(&format!(" OFFSET {}", offset));
    }
}

/// Fluent query builder for locations.
///
/// Use this with [`Store::query_locations`](crate::Store::query_locations).
///
/// ```
/// use skycache_store::LocationQuery;
///
/// let by_key = LocationQuery::new().location_setting("99705");
/// let everything = LocationQuery::new();
/// # let _ = (by_key, everything);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LocationQuery {
    /// Filter by exact location setting.
    pub location_setting: Option<String>,
    /// Filter by exact city name.
    pub city_name: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

impl LocationQuery {
    /// Create a query matching every location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the location with this setting.
    pub fn location_setting(mut self, location_setting: &str) -> Self {
        self.location_setting = Some(location_setting.to_string());
        self
    }

    /// Only locations with this city name.
    pub fn city_name(mut self, city_name: &str) -> Self {
        self.city_name = Some(city_name.to_string());
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Params) {
        let mut conditions = Vec::new();
        let mut params: Params = Vec::new();

        if let Some(ref setting) = self.location_setting {
            conditions.push("location_setting = ?");
            params.push(Box::new(setting.clone()));
        }

        if let Some(ref city) = self.city_name {
            conditions.push("city_name = ?");
            params.push(Box::new(city.clone()));
        }

        (where_clause(&conditions), params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();

        let mut sql = format!(
            "SELECT _id, city_name, coord_lat, coord_long, location_setting \
             FROM location {}",
            where_clause
        );
        push_pagination(&mut sql, self.limit, None);
        sql
    }
}

/// Sort order for date-ordered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest date first.
    Ascending,
    /// Newest date first.
    Descending,
}

/// Fluent query builder for weather observations.
///
/// Use this with [`Store::query_weather`](crate::Store::query_weather) and
/// [`Store::export_weather_csv`](crate::Store::export_weather_csv).
///
/// ```
/// use skycache_store::WeatherQuery;
/// use skycache_types::DayBucket;
///
/// // The next week for one location, in calendar order
/// let today = DayBucket::today();
/// let week = WeatherQuery::new()
///     .location_id(1)
///     .from_day(today)
///     .before_day(today.offset(7))
///     .oldest_first();
/// # let _ = week;
/// ```
#[derive(Debug, Default, Clone)]
pub struct WeatherQuery {
    /// Filter by owning location row.
    pub location_id: Option<i64>,
    /// Filter by owning location's setting.
    pub location_setting: Option<String>,
    /// Only observations on this calendar day.
    pub day: Option<DayBucket>,
    /// Only observations at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Only observations at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Only observations from the start of this day onwards.
    pub first_day: Option<DayBucket>,
    /// Only observations before the start of this day.
    pub end_day: Option<DayBucket>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
    /// Explicit sort by date. `None` leaves the order unspecified.
    pub order: Option<SortOrder>,
}

impl WeatherQuery {
    /// Create a query matching every observation, in unspecified order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only observations for this location row.
    pub fn location_id(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Only observations whose location has this setting.
    pub fn location_setting(mut self, location_setting: &str) -> Self {
        self.location_setting = Some(location_setting.to_string());
        self
    }

    /// Only observations falling on this calendar day, at any time of day.
    pub fn on_day(mut self, day: DayBucket) -> Self {
        self.day = Some(day);
        self
    }

    /// Only observations at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Only observations at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Only observations from the start of `day` onwards.
    pub fn from_day(mut self, day: DayBucket) -> Self {
        self.first_day = Some(day);
        self
    }

    /// Only observations before the start of `day`.
    pub fn before_day(mut self, day: DayBucket) -> Self {
        self.end_day = Some(day);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sort by date ascending.
    pub fn oldest_first(mut self) -> Self {
        self.order = Some(SortOrder::Ascending);
        self
    }

    /// Sort by date descending.
    pub fn newest_first(mut self) -> Self {
        self.order = Some(SortOrder::Descending);
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Params) {
        let mut conditions = Vec::new();
        let mut params: Params = Vec::new();

        if let Some(location_id) = self.location_id {
            conditions.push("location_id = ?");
            params.push(Box::new(location_id));
        }

        if let Some(ref setting) = self.location_setting {
            conditions.push("location_id IN (SELECT _id FROM location WHERE location_setting = ?)");
            params.push(Box::new(setting.clone()));
        }

        if let Some(day) = self.day {
            conditions.push("date >= ?");
            params.push(Box::new(day.start()));
            conditions.push("date <= ?");
            params.push(Box::new(day.last()));
        }

        if let Some(day) = self.first_day {
            conditions.push("date >= ?");
            params.push(Box::new(day.start()));
        }

        if let Some(day) = self.end_day {
            conditions.push("date < ?");
            params.push(Box::new(day.start()));
        }

        if let Some(since) = self.since {
            conditions.push("date >= ?");
            params.push(Box::new(since.unix_timestamp()));
        }

        if let Some(until) = self.until {
            conditions.push("date <= ?");
            params.push(Box::new(until.unix_timestamp()));
        }

        (where_clause(&conditions), params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();

        let mut sql = format!(
            "SELECT _id, location_id, date, short_desc, weather_id, min_temp, max_temp, \
             humidity, pressure, wind_speed, degrees \
             FROM weather {}",
            where_clause
        );

        match self.order {
            Some(SortOrder::Ascending) => sql.push_str(" ORDER BY date ASC, _id ASC"),
            Some(SortOrder::Descending) => sql.push_str(" ORDER BY date DESC, _id DESC"),
            None => {}
        }

        push_pagination(&mut sql, self.limit, self.offset);
        sql
    }
}
