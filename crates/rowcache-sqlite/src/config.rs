use rowcache_core::{
    ConfigError,
    config::{load_toml_path, load_toml_str},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

///
/// SqliteConfig
///
/// Connection parameters for `SqliteSource`, read from the `[sqlite]` table
/// of the same document that holds `[store]`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteConfig {
    /// Database file; `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// Log every rendered statement and its parameters at debug level.
    pub debug_sql: bool,
}

impl SqliteConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let document: Document = load_toml_str(text)?;

        Ok(document.sqlite)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let document: Document = load_toml_path(path)?;

        Ok(document.sqlite)
    }
}

// Other tables in the document belong to other components.
#[derive(Default, Deserialize)]
#[serde(default)]
struct Document {
    sqlite: SqliteConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sqlite_table_and_ignores_store() {
        let config = SqliteConfig::from_toml_str(
            r#"
            [store]
            preload_count = 40

            [sqlite]
            path = "people.db"
            debug_sql = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.path.as_deref(), Some(Path::new("people.db")));
        assert!(config.debug_sql);
    }

    #[test]
    fn missing_table_is_in_memory() {
        let config = SqliteConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, SqliteConfig::default());
    }

    #[test]
    fn unknown_sqlite_key_is_rejected() {
        let err = SqliteConfig::from_toml_str("[sqlite]\ndialect = \"postgres\"\n")
            .expect_err("unknown key must fail");

        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
