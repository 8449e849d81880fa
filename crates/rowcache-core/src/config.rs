//! Explicit configuration objects.
//!
//! Every component receives its configuration through a constructor; there
//! is no ambient option state.

use crate::{DEFAULT_PRELOAD_COUNT, error::ConfigError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::Path;

///
/// RowCacheConfig
///
/// Top-level `[store]` table. Backends read their own tables from the same
/// document with `load_toml_str`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RowCacheConfig {
    pub store: StoreConfig,
}

impl RowCacheConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = load_toml_str(text)?;
        config.store.validate()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load_toml_path(path)?;
        config.store.validate()?;

        Ok(config)
    }
}

///
/// StoreConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Rows fetched per cache miss.
    pub preload_count: usize,
    /// Raw order string, e.g. `"nationality asc, name desc"`.
    pub order: String,
}

impl StoreConfig {
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.preload_count == 0 {
            return Err(ConfigError::InvalidPreloadCount {
                count: self.preload_count,
            });
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preload_count: DEFAULT_PRELOAD_COUNT,
            order: String::new(),
        }
    }
}

/// Deserialize any config type from TOML text.
pub fn load_toml_str<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Deserialize any config type from a TOML file.
pub fn load_toml_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_toml_str(&text)
}
