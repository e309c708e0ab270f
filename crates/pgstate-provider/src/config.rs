//! Provider configuration
//!
//! Loaded from an optional TOML file, then overridden by `PGSTATE_*`
//! environment variables (`PGSTATE_HOSTNAME`, `PGSTATE_PORT`,
//! `PGSTATE_DATABASE_NAME`, `PGSTATE_USERNAME`, `PGSTATE_PASSWORD`,
//! `PGSTATE_MAX_CONNECTIONS`).

use pgstate_db::DatabaseConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::postgres::PgConnectOptions;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ProviderError, Result};
use crate::provider::Provider;

pub const ENV_PREFIX: &str = "PGSTATE";
pub const DEFAULT_DATABASE_NAME: &str = "postgres";

/// Database password, wiped from memory on drop
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Connection settings supplied by the orchestrator
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Host name of the server
    pub hostname: String,

    /// TCP port, 1-65535
    pub port: i32,

    /// Database to connect to, `postgres` when unset
    #[serde(default)]
    pub database_name: Option<String>,

    /// User to connect as
    pub username: String,

    #[serde(default)]
    pub password: Option<Password>,

    /// Pool size; zero or unset uses the pool default
    #[serde(default)]
    pub max_connections: Option<i32>,
}

impl ProviderConfig {
    /// Load from `path` (if any) and `PGSTATE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix(env_prefix));

        let config: ProviderConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings against [`Provider::schema`], then reject blank
    /// strings the schema types cannot express.
    pub fn validate(&self) -> Result<()> {
        Provider::schema().validate(&self.as_attributes())?;

        if self.hostname.trim().is_empty() {
            return Err(ProviderError::Config("`hostname` is required".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(ProviderError::Config("`username` is required".to_string()));
        }
        if matches!(self.database_name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ProviderError::Config(
                "`database_name` cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    // The password is replaced by a placeholder; only its type is checked.
    fn as_attributes(&self) -> Value {
        json!({
            "hostname": self.hostname,
            "port": self.port,
            "database_name": self.database_name,
            "username": self.username,
            "password": self.password.as_ref().map(|_| "(sensitive)"),
            "max_connections": self.max_connections,
        })
    }

    pub fn database_name(&self) -> &str {
        self.database_name.as_deref().unwrap_or(DEFAULT_DATABASE_NAME)
    }

    /// Pool configuration for these settings
    pub fn database_config(&self) -> Result<DatabaseConfig> {
        self.validate()?;

        let port = u16::try_from(self.port)
            .map_err(|_| ProviderError::Config(format!("invalid port {}", self.port)))?;

        let mut options = PgConnectOptions::new()
            .host(&self.hostname)
            .port(port)
            .database(self.database_name())
            .username(&self.username);
        if let Some(password) = &self.password {
            options = options.password(password.expose());
        }

        let max_connections = self.max_connections.unwrap_or(0).max(0) as u32;
        Ok(DatabaseConfig::new(options).with_max_connections(max_connections))
    }
}
