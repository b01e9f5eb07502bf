//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file overlaid with `HOOKWIRE__*` environment variables.
//! Every field has a default, so an absent file yields a usable config.

pub mod dispatch;
pub mod logging;
pub mod modules;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::dispatch::DispatchConfig;
use self::logging::LoggingConfig;
use self::modules::ModulesConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Module discovery settings.
    #[serde(default)]
    pub modules: ModulesConfig,
    /// Filter dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// A missing file is not an error. Environment variables prefixed with
    /// `HOOKWIRE__` override file values (`HOOKWIRE__DISPATCH__CHAIN_FILTERS=true`).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("HOOKWIRE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
