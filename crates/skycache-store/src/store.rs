//! Main store implementation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use skycache_types::{DailyWeather, LocationInfo};

use crate::error::{Error, Result};
use crate::events::{EVENT_CAPACITY, EventReceiver, EventSender, StoreEvent};
use crate::models::{ForecastBatch, ImportResult, Location, NewObservation, WeatherObservation};
use crate::queries::{LocationQuery, WeatherQuery};
use crate::schema;

/// Where the database lives.
#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Memory,
}

impl Target {
    fn display_path(&self) -> PathBuf {
        match self {
            Target::File(path) => path.clone(),
            Target::Memory => PathBuf::from(":memory:"),
        }
    }
}

/// Lifecycle of a store handle: `Unopened -> Open -> Closed`.
#[derive(Debug)]
enum State {
    Unopened,
    Open(Connection),
    Closed,
}

/// A finished query result.
///
/// Rows are read completely while the store lock is held, so iterating
/// never observes writes made after the query ran. Each query call returns
/// a new, independent sequence.
#[derive(Debug, Clone)]
pub struct Records<T> {
    rows: std::vec::IntoIter<T>,
}

impl<T> Records<T> {
    fn new(rows: Vec<T>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// Whether no rows remain.
    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }
}

impl<T> Iterator for Records<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<T> ExactSizeIterator for Records<T> {}

/// SQLite-based cache of locations and daily weather.
///
/// All operations are synchronous. A single mutex serializes every
/// insert, query and reset issued through one handle, so a `Store` can be
/// shared between threads behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    target: Target,
    state: Mutex<State>,
    events: EventSender,
}

impl Store {
    /// Create an unopened handle for a database file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_target(Target::File(path.as_ref().to_path_buf()))
    }

    /// Create an unopened handle for a private in-memory database.
    pub fn new_in_memory() -> Self {
        Self::with_target(Target::Memory)
    }

    fn with_target(target: Target) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            target,
            state: Mutex::new(State::Unopened),
            events,
        }
    }

    /// Open or create a database at the given path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self::new(path);
        store.open()?;
        Ok(store)
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open_at(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::new_in_memory();
        store.open()?;
        Ok(store)
    }

    /// Open the backing database, creating it and its tables if needed.
    ///
    /// Opening an already-open handle does nothing. A closed handle cannot
    /// be reopened.
    pub fn open(&self) -> Result<()> {
        let mut state = self.lock();
        match *state {
            State::Open(_) => Ok(()),
            State::Closed => Err(Error::StoreClosed),
            State::Unopened => {
                let conn = self.connect()?;
                *state = State::Open(conn);
                Ok(())
            }
        }
    }

    /// Release the database connection.
    ///
    /// Closing an unopened handle does nothing.
    pub fn close(&self) {
        let mut state = self.lock();
        if let State::Open(_) = *state {
            *state = State::Closed;
            info!("Closed store at {}", self.target.display_path().display());
        }
    }

    /// Whether the handle is currently open.
    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), State::Open(_))
    }

    /// Path of the database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File(path) => Some(path),
            Target::Memory => None,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect(&self) -> Result<Connection> {
        let path = self.target.display_path();
        let init_err = |source| Error::StorageInit {
            path: path.clone(),
            source,
        };

        let conn = match &self.target {
            Target::File(file) => {
                // Create parent directories if needed
                if let Some(parent) = file.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                            path: parent.to_path_buf(),
                            source: e,
                        })?;
                    }
                }

                info!("Opening store at {}", file.display());
                let conn = Connection::open(file).map_err(init_err)?;
                conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                    .map_err(init_err)?;
                conn
            }
            Target::Memory => Connection::open_in_memory().map_err(init_err)?,
        };

        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(init_err)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(init_err)?;

        schema::initialize(&conn).map_err(|e| match e {
            Error::Database(source) => init_err(source),
            other => other,
        })?;

        Ok(conn)
    }

    /// Run `f` against the open connection while holding the store lock.
    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut state = self.lock();
        match &mut *state {
            State::Open(conn) => f(conn),
            State::Unopened => Err(Error::NotOpen),
            State::Closed => Err(Error::StoreClosed),
        }
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}

// Schema operations
impl Store {
    /// Schema version recorded in the database file.
    pub fn schema_version(&self) -> Result<i32> {
        self.with_conn(|conn| schema::schema_version(conn))
    }

    /// Compare the stored schema version with [`schema::SCHEMA_VERSION`]
    /// and recreate the cache if they differ.
    ///
    /// Returns `true` when the cache was recreated.
    pub fn ensure_schema_version(&self) -> Result<bool> {
        let recreated = self.with_conn(|conn| {
            let found = schema::schema_version(conn)?;
            if found == schema::SCHEMA_VERSION {
                return Ok(false);
            }

            warn!(
                "Schema version {} does not match {}, recreating cache",
                found,
                schema::SCHEMA_VERSION
            );
            schema::recreate(conn)?;
            Ok(true)
        })?;

        if recreated {
            self.notify(StoreEvent::Reset);
        }
        Ok(recreated)
    }

    /// Drop every row of both kinds and recreate empty tables.
    ///
    /// Safe to call repeatedly, and on a handle that has not been opened
    /// yet (the database is created first).
    pub fn reset(&self) -> Result<()> {
        self.open()?;
        self.with_conn(|conn| schema::recreate(conn))?;
        info!("Reset store at {}", self.target.display_path().display());
        self.notify(StoreEvent::Reset);
        Ok(())
    }
}

/// Extended SQLite result code for a constraint failure, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

fn insert_location_row(conn: &Connection, location: &LocationInfo) -> Result<i64> {
    location.validate()?;

    let result = conn.execute(
        "INSERT INTO location (city_name, coord_lat, coord_long, location_setting)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            location.city_name,
            location.latitude,
            location.longitude,
            location.location_setting,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
            warn!(
                "Rejected duplicate location '{}'",
                location.location_setting
            );
            Err(Error::Duplicate {
                location_setting: location.location_setting.clone(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn insert_weather_row(conn: &Connection, location_id: i64, weather: &DailyWeather) -> Result<i64> {
    weather.validate()?;

    let result = conn.execute(
        "INSERT INTO weather (location_id, date, short_desc, weather_id, min_temp,
         max_temp, humidity, pressure, wind_speed, degrees)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            location_id,
            weather.date,
            weather.short_desc,
            weather.weather_id,
            weather.min_temp,
            weather.max_temp,
            weather.humidity,
            weather.pressure,
            weather.wind_speed,
            weather.degrees,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            warn!("Rejected weather row for unknown location {}", location_id);
            Err(Error::Reference { location_id })
        }
        Err(e) => Err(e.into()),
    }
}

fn find_location_row(conn: &Connection, location_setting: &str) -> Result<Option<Location>> {
    let location = conn
        .query_row(
            "SELECT _id, city_name, coord_lat, coord_long, location_setting
             FROM location WHERE location_setting = ?",
            [location_setting],
            Location::from_row,
        )
        .optional()?;
    Ok(location)
}

// Location operations
impl Store {
    /// Insert a new location and return its row id.
    ///
    /// Fails with [`Error::Duplicate`] if a location with the same
    /// `location_setting` exists; no row is created in that case.
    pub fn insert_location(&self, location: &LocationInfo) -> Result<i64> {
        let id = self.with_conn(|conn| insert_location_row(conn, location))?;
        debug!("Inserted location '{}' as {}", location.location_setting, id);

        self.notify(StoreEvent::LocationInserted {
            id,
            location_setting: location.location_setting.clone(),
        });
        Ok(id)
    }

    /// Return the id of the location with this setting, inserting it first
    /// if it is not cached yet.
    pub fn location_id_or_insert(&self, location: &LocationInfo) -> Result<i64> {
        if let Some(existing) = self.find_location(&location.location_setting)? {
            return Ok(existing.id);
        }
        match self.insert_location(location) {
            Err(Error::Duplicate { .. }) => self
                .find_location(&location.location_setting)?
                .map(|l| l.id)
                .ok_or_else(|| Error::Duplicate {
                    location_setting: location.location_setting.clone(),
                }),
            other => other,
        }
    }

    /// Get a location by row id.
    pub fn get_location(&self, id: i64) -> Result<Option<Location>> {
        self.with_conn(|conn| {
            let location = conn
                .query_row(
                    "SELECT _id, city_name, coord_lat, coord_long, location_setting
                     FROM location WHERE _id = ?",
                    [id],
                    Location::from_row,
                )
                .optional()?;
            Ok(location)
        })
    }

    /// Get a location by its setting.
    pub fn find_location(&self, location_setting: &str) -> Result<Option<Location>> {
        self.with_conn(|conn| find_location_row(conn, location_setting))
    }

    /// Query locations with filters.
    pub fn query_locations(&self, query: &LocationQuery) -> Result<Records<Location>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        self.with_conn(|conn| {
            let params_ref: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_ref.as_slice(), Location::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Records::new(rows))
        })
    }

    /// Count cached locations.
    pub fn count_locations(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM location", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
}

// Weather operations
impl Store {
    /// Insert a weather observation and return its row id.
    ///
    /// Fails with [`Error::Reference`] if `location_id` does not name an
    /// existing location; no row is created in that case.
    pub fn insert_weather(&self, observation: &NewObservation) -> Result<i64> {
        let id = self.with_conn(|conn| {
            insert_weather_row(conn, observation.location_id, &observation.weather)
        })?;
        debug!(
            "Inserted weather {} for location {} on {}",
            id,
            observation.location_id,
            observation.weather.day()
        );

        self.notify(StoreEvent::WeatherInserted {
            location_id: observation.location_id,
            count: 1,
        });
        Ok(id)
    }

    /// Insert several days for one location in a single transaction.
    ///
    /// Either every row is inserted or none is.
    pub fn insert_weather_batch(&self, location_id: i64, days: &[DailyWeather]) -> Result<usize> {
        let inserted = self.with_conn(|conn| {
            let tx = conn.transaction()?;
            for day in days {
                insert_weather_row(&tx, location_id, day)?;
            }
            tx.commit()?;
            Ok(days.len())
        })?;

        info!(
            "Inserted {} weather rows for location {}",
            inserted, location_id
        );
        if inserted > 0 {
            self.notify(StoreEvent::WeatherInserted {
                location_id,
                count: inserted,
            });
        }
        Ok(inserted)
    }

    /// Query weather observations with filters.
    pub fn query_weather(&self, query: &WeatherQuery) -> Result<Records<WeatherObservation>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        self.with_conn(|conn| {
            let params_ref: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_ref.as_slice(), WeatherObservation::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Records::new(rows))
        })
    }

    /// Count weather observations, optionally for one location.
    pub fn count_weather(&self, location_id: Option<i64>) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = match location_id {
                Some(id) => conn.query_row(
                    "SELECT COUNT(*) FROM weather WHERE location_id = ?",
                    [id],
                    |row| row.get(0),
                )?,
                None => conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?,
            };
            Ok(count as u64)
        })
    }

    /// Export matching observations as CSV with a header row of column names.
    pub fn export_weather_csv(&self, query: &WeatherQuery) -> Result<String> {
        let rows = self.query_weather(query)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(schema::weather::COLUMNS)?;
        for row in rows {
            writer.serialize(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Csv(e.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// Ingestion
impl Store {
    /// Import a fetched forecast for one location.
    ///
    /// The location is looked up by its setting and created if missing.
    /// All days are appended in one transaction together with the location
    /// insert; existing rows for the same days are left untouched.
    pub fn import_forecast(&self, batch: &ForecastBatch) -> Result<ImportResult> {
        let result = self.with_conn(|conn| {
            let tx = conn.transaction()?;

            let (location_id, location_created) =
                match find_location_row(&tx, &batch.location.location_setting)? {
                    Some(existing) => (existing.id, false),
                    None => (insert_location_row(&tx, &batch.location)?, true),
                };

            for day in &batch.days {
                insert_weather_row(&tx, location_id, day)?;
            }
            tx.commit()?;

            Ok(ImportResult {
                location_id,
                location_created,
                inserted: batch.days.len(),
            })
        })?;

        info!(
            "Imported {} days for '{}' (location {})",
            result.inserted, batch.location.location_setting, result.location_id
        );

        if result.location_created {
            self.notify(StoreEvent::LocationInserted {
                id: result.location_id,
                location_setting: batch.location.location_setting.clone(),
            });
        }
        if result.inserted > 0 {
            self.notify(StoreEvent::WeatherInserted {
                location_id: result.location_id,
                count: result.inserted,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        TEST_DATE, TEST_LOCATION, build_location_fixture, build_weather_fixture,
        north_pole_location,
    };
    use crate::validate::{Record, validate_record, validate_single};
    use skycache_types::{DayBucket, SECONDS_PER_DAY};

    fn store_with_north_pole() -> (Store, i64) {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_location(&north_pole_location()).unwrap();
        (store, id)
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.is_open());
        assert!(store.path().is_none());
        assert_eq!(store.count_locations().unwrap(), 0);
        assert_eq!(store.count_weather(None).unwrap(), 0);
    }

    #[test]
    fn test_insert_and_query_location() {
        let (store, id) = store_with_north_pole();
        assert!(id > 0);

        let query = LocationQuery::new().location_setting(TEST_LOCATION);
        let rows = store.query_locations(&query).unwrap();
        validate_single(&north_pole_location().to_fields(), rows).unwrap();

        let location = store.get_location(id).unwrap().unwrap();
        assert_eq!(location.to_info(), north_pole_location());
    }

    #[test]
    fn test_duplicate_location_rejected() {
        let (store, _) = store_with_north_pole();

        let err = store.insert_location(&north_pole_location()).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate { ref location_setting } if location_setting == TEST_LOCATION
        ));
        assert!(err.is_recoverable());
        assert_eq!(store.count_locations().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_setting_with_different_city_rejected() {
        let (store, _) = store_with_north_pole();
        let other = build_location_fixture(TEST_LOCATION, "Fairbanks", 64.8378, -147.7164);

        assert!(matches!(
            store.insert_location(&other),
            Err(Error::Duplicate { .. })
        ));

        let cities: Vec<_> = store
            .query_locations(&LocationQuery::new())
            .unwrap()
            .map(|l| l.city_name)
            .collect();
        assert_eq!(cities, vec!["North Pole".to_string()]);
    }

    #[test]
    fn test_location_id_or_insert() {
        let store = Store::open_in_memory().unwrap();
        let first = store.location_id_or_insert(&north_pole_location()).unwrap();
        let second = store.location_id_or_insert(&north_pole_location()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count_locations().unwrap(), 1);
    }

    #[test]
    fn test_invalid_location_rejected_before_insert() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .insert_location(&build_location_fixture("", "Nowhere", 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_query_weather() {
        let (store, location_id) = store_with_north_pole();
        let fixture = build_weather_fixture(location_id, TEST_DATE);

        let id = store.insert_weather(&fixture).unwrap();
        assert!(id > 0);

        let rows = store
            .query_weather(&WeatherQuery::new().location_id(location_id))
            .unwrap();
        assert_eq!(rows.len(), 1);
        validate_single(&fixture.to_fields(), rows).unwrap();
    }

    #[test]
    fn test_weather_with_unknown_location_rejected() {
        let (store, location_id) = store_with_north_pole();
        let dangling = location_id + 100;

        let err = store
            .insert_weather(&build_weather_fixture(dangling, TEST_DATE))
            .unwrap_err();
        assert!(matches!(err, Error::Reference { location_id } if location_id == dangling));
        assert_eq!(store.count_weather(None).unwrap(), 0);
    }

    #[test]
    fn test_weather_for_same_day_may_repeat() {
        let (store, location_id) = store_with_north_pole();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE))
            .unwrap();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE + 60))
            .unwrap();

        assert_eq!(store.count_weather(Some(location_id)).unwrap(), 2);
    }

    #[test]
    fn test_query_weather_by_day_ignores_time_of_day() {
        let (store, location_id) = store_with_north_pole();
        let late = TEST_DATE + SECONDS_PER_DAY - 1;
        let next_morning = TEST_DATE + SECONDS_PER_DAY + 1;
        store
            .insert_weather(&build_weather_fixture(location_id, late))
            .unwrap();
        store
            .insert_weather(&build_weather_fixture(location_id, next_morning))
            .unwrap();

        let day = DayBucket::of(TEST_DATE + 12 * 3_600);
        let rows: Vec<_> = store
            .query_weather(&WeatherQuery::new().on_day(day))
            .unwrap()
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, late);
    }

    #[test]
    fn test_query_weather_at_timestamp_extremes() {
        let (store, location_id) = store_with_north_pole();
        for date in [i64::MIN, 0, i64::MAX] {
            store
                .insert_weather(&build_weather_fixture(location_id, date))
                .unwrap();
        }

        let first = DayBucket::of(i64::MIN);
        let last = DayBucket::of(i64::MAX);
        let dates = |query: WeatherQuery| -> Vec<i64> {
            store
                .query_weather(&query.oldest_first())
                .unwrap()
                .map(|w| w.date)
                .collect()
        };

        assert_eq!(dates(WeatherQuery::new().on_day(first)), vec![i64::MIN]);
        assert_eq!(dates(WeatherQuery::new().on_day(last)), vec![i64::MAX]);
        assert!(dates(WeatherQuery::new().before_day(first)).is_empty());
        assert_eq!(
            dates(WeatherQuery::new().from_day(last)),
            vec![i64::MAX]
        );
        assert_eq!(
            dates(WeatherQuery::new().from_day(first).before_day(last)),
            vec![i64::MIN, 0]
        );
    }

    #[test]
    fn test_query_weather_by_location_setting() {
        let (store, north_pole) = store_with_north_pole();
        let other = store
            .insert_location(&build_location_fixture("10001", "New York", 40.75, -73.99))
            .unwrap();
        store
            .insert_weather(&build_weather_fixture(north_pole, TEST_DATE))
            .unwrap();
        store
            .insert_weather(&build_weather_fixture(other, TEST_DATE))
            .unwrap();

        let rows: Vec<_> = store
            .query_weather(&WeatherQuery::new().location_setting(TEST_LOCATION))
            .unwrap()
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location_id, north_pole);
    }

    #[test]
    fn test_query_weather_sorted_with_pagination() {
        let (store, location_id) = store_with_north_pole();
        let days: Vec<_> = (0..5)
            .rev()
            .map(|i| build_weather_fixture(location_id, TEST_DATE + i * SECONDS_PER_DAY).weather)
            .collect();
        store.insert_weather_batch(location_id, &days).unwrap();

        let dates: Vec<_> = store
            .query_weather(&WeatherQuery::new().oldest_first().limit(2).offset(1))
            .unwrap()
            .map(|w| w.date)
            .collect();
        assert_eq!(
            dates,
            vec![TEST_DATE + SECONDS_PER_DAY, TEST_DATE + 2 * SECONDS_PER_DAY]
        );

        let newest = store
            .query_weather(&WeatherQuery::new().newest_first().limit(1))
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(newest.date, TEST_DATE + 4 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_weather_batch_is_atomic() {
        let (store, location_id) = store_with_north_pole();
        let mut bad = build_weather_fixture(location_id, TEST_DATE + 1).weather;
        bad.short_desc = String::new();
        let days = vec![build_weather_fixture(location_id, TEST_DATE).weather, bad];

        assert!(store.insert_weather_batch(location_id, &days).is_err());
        assert_eq!(store.count_weather(None).unwrap(), 0);
    }

    #[test]
    fn test_records_are_snapshots() {
        let (store, location_id) = store_with_north_pole();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE))
            .unwrap();

        let mut rows = store.query_weather(&WeatherQuery::new()).unwrap();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE + 1))
            .unwrap();

        assert!(rows.next().is_some());
        assert!(rows.next().is_none());
        assert!(rows.is_empty());

        // A fresh query is a fresh sequence
        assert_eq!(store.query_weather(&WeatherQuery::new()).unwrap().len(), 2);
    }

    #[test]
    fn test_reset_removes_everything() {
        let (store, location_id) = store_with_north_pole();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE))
            .unwrap();

        store.reset().unwrap();
        store.reset().unwrap();

        assert!(store.query_locations(&LocationQuery::new()).unwrap().is_empty());
        assert!(store.query_weather(&WeatherQuery::new()).unwrap().is_empty());

        // The uniqueness constraint survives a reset
        store.insert_location(&north_pole_location()).unwrap();
        assert!(store.insert_location(&north_pole_location()).is_err());
    }

    #[test]
    fn test_reset_on_unopened_store() {
        let store = Store::new_in_memory();
        store.reset().unwrap();
        assert!(store.is_open());
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_state_machine() {
        let store = Store::new_in_memory();
        assert!(!store.is_open());
        assert!(matches!(store.count_locations(), Err(Error::NotOpen)));

        // close() on an unopened handle is a no-op
        store.close();
        store.open().unwrap();
        store.open().unwrap();
        assert!(store.is_open());

        store.close();
        assert!(!store.is_open());
        assert!(matches!(
            store.insert_location(&north_pole_location()),
            Err(Error::StoreClosed)
        ));
        assert!(matches!(
            store.query_weather(&WeatherQuery::new()),
            Err(Error::StoreClosed)
        ));
        assert!(matches!(store.open(), Err(Error::StoreClosed)));
        assert!(matches!(store.reset(), Err(Error::StoreClosed)));
    }

    #[test]
    fn test_schema_version_matches() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert!(!store.ensure_schema_version().unwrap());
    }

    #[test]
    fn test_ensure_schema_version_recreates_on_mismatch() {
        let (store, _) = store_with_north_pole();
        store
            .with_conn(|conn| {
                conn.execute_batch("PRAGMA user_version = 99")?;
                Ok(())
            })
            .unwrap();

        assert!(store.ensure_schema_version().unwrap());
        assert_eq!(store.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_import_forecast_creates_location_once() {
        let store = Store::open_in_memory().unwrap();
        let batch = ForecastBatch {
            location: north_pole_location(),
            days: vec![
                build_weather_fixture(0, TEST_DATE).weather,
                build_weather_fixture(0, TEST_DATE + SECONDS_PER_DAY).weather,
            ],
        };

        let first = store.import_forecast(&batch).unwrap();
        assert!(first.location_created);
        assert_eq!(first.inserted, 2);

        let second = store.import_forecast(&batch).unwrap();
        assert!(!second.location_created);
        assert_eq!(second.location_id, first.location_id);

        assert_eq!(store.count_locations().unwrap(), 1);
        assert_eq!(store.count_weather(Some(first.location_id)).unwrap(), 4);
    }

    #[test]
    fn test_import_forecast_rolls_back_location_on_bad_day() {
        let store = Store::open_in_memory().unwrap();
        let mut bad = build_weather_fixture(0, TEST_DATE).weather;
        bad.pressure = f64::NAN;
        let batch = ForecastBatch {
            location: north_pole_location(),
            days: vec![bad],
        };

        assert!(store.import_forecast(&batch).is_err());
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_export_weather_csv() {
        let (store, location_id) = store_with_north_pole();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE))
            .unwrap();

        let csv = store.export_weather_csv(&WeatherQuery::new()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "_id,location_id,date,short_desc,weather_id,min_temp,max_temp,humidity,pressure,wind_speed,degrees"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("1419033600"));
        assert!(row.contains("Asteroids"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_validate_record_catches_mismatch() {
        let (store, location_id) = store_with_north_pole();
        store
            .insert_weather(&build_weather_fixture(location_id, TEST_DATE))
            .unwrap();

        let mut expected = build_weather_fixture(location_id, TEST_DATE).to_fields();
        expected.insert(schema::weather::SHORT_DESC, "Meteors");

        let row = store
            .query_weather(&WeatherQuery::new())
            .unwrap()
            .next()
            .unwrap();
        let err = validate_record(&expected, &row).unwrap_err();
        assert!(err.to_string().contains("short_desc"));
    }
}
