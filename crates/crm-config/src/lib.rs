//! # crm-config
//!
//! Layered configuration loading for `crm` using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CRM_*` prefix, `__` as separator)
//! 2. Project-level `.crm/config.toml`
//! 3. User-level `~/.config/crm/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CRM_SCHEMA__PATH` -> `schema.path`,
//! `CRM_NOTIFICATIONS__CAPACITY` -> `notifications.capacity`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use crm_config::CrmConfig;
//!
//! let config = CrmConfig::load_with_dotenv().expect("config");
//!
//! if let Some(path) = config.schema.document_path() {
//!     println!("schema document: {}", path.display());
//! }
//! ```

mod error;
mod general;
mod notifications;
mod schema;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use notifications::NotificationsConfig;
pub use schema::SchemaConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "CRM_";

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".crm/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrmConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CrmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source cannot be read or a value
    /// has the wrong shape, and `ConfigError::InvalidValue` when an extracted
    /// value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and check a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.notifications.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("crm").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::enums::RenderMode;

    #[test]
    fn default_config_loads() {
        let config = CrmConfig::default();
        assert!(!config.schema.is_configured());
        assert!(config.schema.validate_on_load);
        assert_eq!(config.notifications.capacity, 50);
        assert_eq!(config.general.default_mode, RenderMode::Edit);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config = CrmConfig::extract(&CrmConfig::figment()).expect("defaults extract");
            assert_eq!(config, CrmConfig::default());
            Ok(())
        });
    }

    #[test]
    fn global_path_ends_with_crm_config() {
        if let Some(path) = CrmConfig::global_config_path() {
            assert!(path.ends_with("crm/config.toml"));
        }
    }
}
