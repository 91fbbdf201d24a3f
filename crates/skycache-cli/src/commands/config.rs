//! Config command - show and edit the configuration file.

use anyhow::Result;
use clap::ValueEnum;

use crate::cli::{ConfigAction, ConfigKey};
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, mut config: Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::Set { key, value } => {
            config.set(key, &value)?;
            config.save()?;
            println!("Set {} = {}", key_name(key), value.trim());
        }
        ConfigAction::Unset { key } => {
            config.unset(key);
            config.save()?;
            println!("Unset {}", key_name(key));
        }
    }
    Ok(())
}

fn key_name(key: ConfigKey) -> String {
    key.to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_else(|| format!("{:?}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_uses_cli_spelling() {
        assert_eq!(key_name(ConfigKey::DbPath), "db-path");
        assert_eq!(key_name(ConfigKey::Units), "units");
    }
}
