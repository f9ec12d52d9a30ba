use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub wiki_entries_dir: PathBuf,
    pub page_size: i64,
    pub reset_database: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page_size: i64 = try_load(&lookup, "PAGE_SIZE", "10")?;
        if page_size < 1 {
            return Err(ConfigError::Invalid {
                key: "PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://campus.db?mode=rwc")?,
            server_addr: try_load(&lookup, "SERVER_ADDR", "0.0.0.0:3000")?,
            wiki_entries_dir: try_load(&lookup, "WIKI_ENTRIES_DIR", "entries")?,
            page_size,
            reset_database: try_load(&lookup, "RESET_DATABASE", "false")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        })
}
