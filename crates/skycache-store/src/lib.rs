//! Local SQLite cache for locations and their daily weather.
//!
//! This crate owns the cache schema and its consistency rules: one row per
//! distinct location setting, weather rows that always point at an existing
//! location, and calendar-day lookups that ignore time of day.
//!
//! # Features
//!
//! - Explicit `Unopened -> Open -> Closed` handle lifecycle
//! - Duplicate and dangling-reference inserts reported as distinct errors
//! - Query builders with day-bucket, location and range filters
//! - Snapshot result sequences
//! - Change notifications over a broadcast channel
//! - Fixtures and field-level validation for round-trip checks
//!
//! # Example
//!
//! ```no_run
//! use skycache_store::{Store, WeatherQuery};
//! use skycache_types::DayBucket;
//!
//! let store = Store::open_default()?;
//! store.ensure_schema_version()?;
//!
//! let today = WeatherQuery::new()
//!     .location_setting("99705")
//!     .on_day(DayBucket::today());
//! for row in store.query_weather(&today)? {
//!     println!("{}: {}", row.day(), row.short_desc);
//! }
//! # Ok::<(), skycache_store::Error>(())
//! ```

mod error;
mod events;
pub mod fixtures;
mod models;
mod queries;
pub mod schema;
mod store;
mod validate;

pub use error::{Error, Result};
pub use events::{ChangeObserver, EventReceiver, EventSender, StoreEvent};
pub use models::{ForecastBatch, ImportResult, Location, NewObservation, WeatherObservation};
pub use queries::{LocationQuery, SortOrder, WeatherQuery};
pub use schema::SCHEMA_VERSION;
pub use store::{Records, Store};
pub use validate::{
    FieldMap, FieldValue, Record, ValidationError, validate_record, validate_single,
};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/skycache/weather.db`
/// - macOS: `~/Library/Application Support/skycache/weather.db`
/// - Windows: `C:\Users\<user>\AppData\Local\skycache\weather.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("skycache")
        .join("weather.db")
}
