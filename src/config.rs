//! Connection settings for the bundled adapters.
//!
//! [`DatabaseConfig`] is read from `config/config.toml` (optional) and
//! `DECKHAND__`-prefixed environment variables, e.g.
//! `DECKHAND__DATABASE__URL=app.db`. Environment variables win.

use crate::error::Result;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

const ENV_PREFIX: &str = "DECKHAND";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database location. For SQLite a file path, or `:memory:`.
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Create the database file when it does not exist yet.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_db_url() -> String {
    "deckhand.db".to_string()
}

fn default_create_if_missing() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

impl DatabaseConfig {
    /// Load the `[database]` section from `config/config.toml`, falling back to env vars.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Config`](crate::OrmError::Config) when the section
    /// is present but cannot be deserialized.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Same as [`load`](Self::load) with an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Config`](crate::OrmError::Config) when the section
    /// is present but cannot be deserialized.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!(
                    "Failed to load config file {}, falling back to env: {}",
                    path.display(),
                    err
                );
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "failed to load configuration from file ({err}) and env ({env_err})"
                        ))
                    })?
            }
        };

        match settings.get::<DatabaseConfig>("database") {
            Ok(db_config) => Ok(db_config),
            Err(ConfigError::NotFound(_)) => {
                log::debug!("No [database] configuration found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
