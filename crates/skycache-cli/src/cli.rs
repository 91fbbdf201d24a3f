//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::Units;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "skycache")]
#[command(author, version, about = "Local cache for location weather data", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Database file (overrides the configured path)
    #[arg(long, global = true, env = "SKYCACHE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage cached locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Add or list daily weather observations
    Weather {
        #[command(subcommand)]
        action: WeatherAction,
    },

    /// Show the upcoming days for a location
    Forecast {
        /// Location setting (defaults to the configured location)
        #[arg(short, long)]
        location: Option<String>,

        /// Number of days to show, starting today
        #[arg(short = 'n', long, default_value = "7")]
        days: u32,

        /// Temperature units (defaults to the configured units)
        #[arg(short, long, value_enum)]
        units: Option<Units>,
    },

    /// Import a forecast batch from a JSON file
    Import {
        /// Input file, or '-' for stdin
        input: PathBuf,
    },

    /// Drop all cached data and recreate empty tables
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show database information
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Location subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum LocationAction {
    /// Add a location
    Add {
        /// Unique lookup key (postal code or provider slug)
        #[arg(short, long)]
        setting: String,

        /// City name
        #[arg(short, long)]
        city: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// List cached locations
    List {
        /// Only show the location with this setting
        #[arg(short, long)]
        setting: Option<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Weather subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum WeatherAction {
    /// Add one day of weather for a location
    Add {
        /// Location setting the observation belongs to
        #[arg(short, long)]
        location: String,

        /// Observation date (YYYY-MM-DD or Unix epoch seconds)
        #[arg(short, long)]
        date: String,

        /// Short condition description
        #[arg(long)]
        desc: String,

        /// Provider condition code
        #[arg(long, default_value = "800")]
        condition: i32,

        /// Minimum temperature
        #[arg(long, allow_negative_numbers = true)]
        min: f64,

        /// Maximum temperature
        #[arg(long, allow_negative_numbers = true)]
        max: f64,

        /// Relative humidity
        #[arg(long, default_value = "0")]
        humidity: f64,

        /// Atmospheric pressure
        #[arg(long, default_value = "0")]
        pressure: f64,

        /// Wind speed
        #[arg(long, default_value = "0")]
        wind: f64,

        /// Wind direction in degrees
        #[arg(long, default_value = "0")]
        degrees: f64,
    },

    /// List cached observations
    List {
        /// Only show observations for this location setting
        #[arg(short, long)]
        location: Option<String>,

        /// Only show observations on this day (YYYY-MM-DD or epoch seconds)
        #[arg(short, long)]
        day: Option<String>,

        /// Maximum number of rows (0 for all)
        #[arg(short = 'n', long, default_value = "0")]
        limit: u32,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Preferred location setting
    Location,
    /// Temperature units (metric, imperial)
    Units,
    /// Database file path
    DbPath,
    /// Default output format
    Format,
}

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "skycache", "location", "add", "--setting", "99705", "--city", "North Pole", "--lat",
            "64.7488", "--lon", "-147.353",
        ])
        .unwrap();

        match cli.command {
            Commands::Location {
                action: LocationAction::Add { setting, lon, .. },
            } => {
                assert_eq!(setting, "99705");
                assert_eq!(lon, -147.353);
            }
            _ => panic!("expected location add"),
        }
    }

    #[test]
    fn test_weather_list_defaults() {
        let cli = Cli::try_parse_from(["skycache", "weather", "list"]).unwrap();
        match cli.command {
            Commands::Weather {
                action:
                    WeatherAction::List {
                        location,
                        day,
                        limit,
                        format,
                    },
            } => {
                assert!(location.is_none());
                assert!(day.is_none());
                assert_eq!(limit, 0);
                assert!(format.is_none());
            }
            _ => panic!("expected weather list"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["skycache", "-v", "-q", "info"]).is_err());
    }

    #[test]
    fn test_config_key_names() {
        let cli = Cli::try_parse_from(["skycache", "config", "set", "db-path", "/tmp/x.db"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Set {
                    key: ConfigKey::DbPath,
                    ..
                }
            }
        ));
    }
}
