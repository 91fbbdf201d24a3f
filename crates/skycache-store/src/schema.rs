//! Database schema and version tracking.
//!
//! The cache holds exactly two tables. The schema version lives in
//! SQLite's `user_version` pragma; any schema change bumps
//! [`SCHEMA_VERSION`] and the cache is dropped and recreated.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Column names of the `location` table.
pub mod location {
    pub const TABLE: &str = "location";
    pub const ID: &str = "_id";
    pub const CITY_NAME: &str = "city_name";
    pub const COORD_LAT: &str = "coord_lat";
    pub const COORD_LONG: &str = "coord_long";
    pub const LOCATION_SETTING: &str = "location_setting";

    /// All columns, in declaration order.
    pub const COLUMNS: &[&str] = &[ID, CITY_NAME, COORD_LAT, COORD_LONG, LOCATION_SETTING];
}

/// Column names of the `weather` table.
pub mod weather {
    pub const TABLE: &str = "weather";
    pub const ID: &str = "_id";
    pub const LOCATION_ID: &str = "location_id";
    pub const DATE: &str = "date";
    pub const SHORT_DESC: &str = "short_desc";
    pub const WEATHER_ID: &str = "weather_id";
    pub const MIN_TEMP: &str = "min_temp";
    pub const MAX_TEMP: &str = "max_temp";
    pub const HUMIDITY: &str = "humidity";
    pub const PRESSURE: &str = "pressure";
    pub const WIND_SPEED: &str = "wind_speed";
    pub const DEGREES: &str = "degrees";

    /// All columns, in declaration order.
    pub const COLUMNS: &[&str] = &[
        ID,
        LOCATION_ID,
        DATE,
        SHORT_DESC,
        WEATHER_ID,
        MIN_TEMP,
        MAX_TEMP,
        HUMIDITY,
        PRESSURE,
        WIND_SPEED,
        DEGREES,
    ];
}

/// Create both tables if missing and stamp a fresh database with the
/// current version. An existing database keeps whatever version it has;
/// comparing it is the caller's job.
pub(crate) fn initialize(conn: &Connection) -> Result<()> {
    create_tables(conn)?;

    if schema_version(conn)? == 0 {
        set_schema_version(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}

/// Drop both tables and recreate them empty at the current version.
pub(crate) fn recreate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS weather;
         DROP TABLE IF EXISTS location;",
    )?;
    create_tables(conn)?;
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Read the stored schema version (0 for a brand-new database).
pub(crate) fn schema_version(conn: &Connection) -> Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version}"))?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS location (
            _id INTEGER PRIMARY KEY,
            city_name TEXT NOT NULL,
            coord_lat REAL NOT NULL,
            coord_long REAL NOT NULL,
            location_setting TEXT UNIQUE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weather (
            _id INTEGER PRIMARY KEY,
            location_id INTEGER NOT NULL REFERENCES location(_id),
            date INTEGER NOT NULL,
            short_desc TEXT NOT NULL,
            weather_id INTEGER NOT NULL,
            min_temp REAL NOT NULL,
            max_temp REAL NOT NULL,
            humidity REAL NOT NULL,
            pressure REAL NOT NULL,
            wind_speed REAL NOT NULL,
            degrees REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_weather_location_date
            ON weather(location_id, date);
        "#,
    )?;

    Ok(())
}
