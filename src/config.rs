//! Service configuration.
//!
//! Read from a JSON file whose path comes from `KURS_CONFIG` (default
//! `config.json`):
//!
//! ```json
//! {
//!   "Store": "Postgres",
//!   "DBConfig": { "Host": "localhost", "Port": 5432, "User": "kurs",
//!                 "Password": "secret", "DBName": "kurs" },
//!   "ServerConfig": { "Port": 8080 },
//!   "FeedConfig": { "BaseUrl": "https://nationalbank.kz/rss/get_rates.cfm" }
//! }
//! ```
//!
//! With `"Store": "Memory"` rates are kept in process and `DBConfig` may be
//! omitted.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::feed::DEFAULT_BASE_URL;

pub const CONFIG_PATH_VAR: &str = "KURS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    #[serde(rename = "DBName")]
    pub db_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.db_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedConfig {
    pub base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Which store backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "Store", default)]
    pub store: StoreKind,
    #[serde(rename = "DBConfig")]
    pub db: Option<DbConfig>,
    #[serde(rename = "ServerConfig")]
    pub server: ServerConfig,
    #[serde(rename = "FeedConfig", default)]
    pub feed: FeedConfig,
}

impl Config {
    /// Loads the file named by `KURS_CONFIG`, falling back to `config.json`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_file(&path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Can't read config file {}", path.display()))?;

        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.store == StoreKind::Postgres && config.db.is_none() {
            bail!("DBConfig is required for the Postgres store");
        }

        Ok(config)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
