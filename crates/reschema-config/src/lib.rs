//! # reschema-config
//!
//! Layered configuration loading for reschema using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RESCHEMA_*` prefix, `__` as separator)
//! 2. Project-level `.reschema/config.toml`
//! 3. User-level `~/.config/reschema/config.toml`
//! 4. Built-in defaults
//!
//! `RESCHEMA_LOADER__ROOT` maps to `loader.root`,
//! `RESCHEMA_CONVERT__EMBED_TYPES` to `convert.embed_types`.
//!
//! # Usage
//!
//! ```no_run
//! use reschema_config::ReschemaConfig;
//!
//! let config = ReschemaConfig::load().expect("config");
//! let schema_options = config.schema_options().expect("loader");
//! let convert_options = config.convert.options();
//! ```

mod convert;
mod error;
mod loader;

pub use convert::ConvertConfig;
pub use error::ConfigError;
pub use loader::LoaderConfig;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use reschema_core::SchemaOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReschemaConfig {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
}

impl ReschemaConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can inspect it or merge extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".reschema/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("RESCHEMA_").split("__"))
    }

    /// Resolution options for this configuration: a directory loader when
    /// `loader.root` is set, no loader otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unusable loader section.
    pub fn schema_options(&self) -> Result<SchemaOptions, ConfigError> {
        if !self.loader.is_configured() {
            return Ok(SchemaOptions::default());
        }
        Ok(SchemaOptions::default().with_loader(self.loader.directory_loader()?))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reschema").join("config.toml"))
    }
}
