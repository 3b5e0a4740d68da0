//! Configuration management for menuboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "menuboard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "menuboard.db";

/// Store key the order ledger is persisted under.
pub const DEFAULT_ORDERS_KEY: &str = "orders";

/// Asset shown for menu entries without their own image.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "imgnotfound.jpg";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MENUBOARD_`, `__` between sections)
/// 2. TOML config file at `~/.config/menuboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Ledger loading configuration.
    pub ledger: LedgerConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/menuboard/menuboard.db`
    pub database_path: Option<PathBuf>,
    /// Key the order ledger is stored under.
    pub orders_key: String,
}

/// What to do with a persisted ledger that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Reject the whole value and start from an empty ledger.
    #[default]
    Reset,
    /// Keep every order that decodes and drop the rest.
    SkipInvalid,
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::SkipInvalid => write!(f, "skip_invalid"),
        }
    }
}

/// Ledger loading configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Policy for a persisted ledger that fails to decode.
    pub on_malformed: MalformedPolicy,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol printed before prices.
    pub currency_symbol: String,
    /// Names longer than this many characters are shortened on menu tiles.
    pub name_limit: usize,
    /// Asset name used when an entry has no image.
    pub placeholder_image: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            orders_key: DEFAULT_ORDERS_KEY.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            name_limit: 10,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration, reading the TOML file at `config_path` or the
    /// default location.
    ///
    /// A missing file is not an error. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MENUBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.orders_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "orders_key must not be empty".to_string(),
            });
        }

        if self.display.name_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "name_limit must be greater than 0".to_string(),
            });
        }

        if self.display.currency_symbol.is_empty() {
            return Err(Error::ConfigValidation {
                message: "currency_symbol must not be empty".to_string(),
            });
        }

        if self.display.placeholder_image.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "placeholder_image must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Key the order ledger is stored under.
    #[must_use]
    pub fn orders_key(&self) -> &str {
        &self.storage.orders_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.orders_key(), "orders");
        assert_eq!(config.ledger.on_malformed, MalformedPolicy::Reset);
        assert_eq!(config.display.currency_symbol, "₹");
        assert_eq!(config.display.name_limit, 10);
        assert_eq!(config.display.placeholder_image, "imgnotfound.jpg");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_orders_key() {
        let mut config = Config::default();
        config.storage.orders_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("orders_key"));
    }

    #[test]
    fn test_validate_zero_name_limit() {
        let mut config = Config::default();
        config.display.name_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("name_limit"));
    }

    #[test]
    fn test_validate_empty_currency_symbol() {
        let mut config = Config::default();
        config.display.currency_symbol = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("currency_symbol"));
    }

    #[test]
    fn test_validate_empty_placeholder() {
        let mut config = Config::default();
        config.display.placeholder_image = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("placeholder_image"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("menuboard.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("menuboard"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.orders_key(), Config::default().orders_key());
    }

    #[test]
    fn test_load_toml_file() {
        let path = std::env::temp_dir().join(format!("menuboard-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[storage]\norders_key = \"counter-2\"\n\n[ledger]\non_malformed = \"skip_invalid\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.orders_key(), "counter-2");
        assert_eq!(config.ledger.on_malformed, MalformedPolicy::SkipInvalid);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("menuboard-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[display]\nname_limit = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_malformed_policy_deserialize() {
        let ledger: LedgerConfig =
            serde_json::from_str(r#"{"on_malformed": "skip_invalid"}"#).unwrap();
        assert_eq!(ledger.on_malformed, MalformedPolicy::SkipInvalid);
        assert_eq!(MalformedPolicy::SkipInvalid.to_string(), "skip_invalid");
    }

    #[test]
    fn test_display_config_deserialize_partial() {
        let display: DisplayConfig = serde_json::from_str(r#"{"currency_symbol": "Rs."}"#).unwrap();
        assert_eq!(display.currency_symbol, "Rs.");
        assert_eq!(display.name_limit, 10);
    }
}
