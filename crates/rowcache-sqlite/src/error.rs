use rowcache_core::{ConfigError, ErrorClass};
use thiserror::Error as ThisError;

///
/// SqliteError
///
/// Failures raised while rendering, running or decoding a query.
/// Stores box these unmodified into `rowcache_core::Error::Source`.
///

#[derive(Debug, ThisError)]
pub enum SqliteError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { field: String, entity: &'static str },

    /// Computed fields have no column a query can reference.
    #[error("field '{field}' has no column mapping")]
    UnmappedField { field: String },

    #[error("column {column} of '{entity}' holds a blob")]
    UnsupportedColumnType { entity: &'static str, column: usize },

    #[error("row of '{entity}' could not be decoded: {reason}")]
    Decode {
        entity: &'static str,
        reason: String,
    },

    #[error("value {value} does not fit a SQL integer")]
    IntegerOverflow { value: usize },
}

impl SqliteError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Sqlite(_) => ErrorClass::Io,
            Self::Config(_) => ErrorClass::Config,
            Self::UnknownField { .. } | Self::UnmappedField { .. } => ErrorClass::Unsupported,
            Self::UnsupportedColumnType { .. } | Self::Decode { .. } | Self::IntegerOverflow { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }
}
