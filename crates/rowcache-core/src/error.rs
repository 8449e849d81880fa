use crate::search::SearchError;
use std::{fmt, path::PathBuf};
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error surfaced by stores, locators and searchers.
///
/// A row the source no longer returns is not an error: `RowStore::get`
/// reports it as `Ok(None)`.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("row index {index} out of range for {row_count} rows")]
    IndexOutOfRange { index: isize, row_count: usize },

    /// Data source failure, boxed unmodified.
    #[error("data source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a data source failure.
    pub(crate) fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) => ErrorClass::Config,
            Self::Search(err) => err.class(),
            Self::IndexOutOfRange { .. } => ErrorClass::InvariantViolation,
            Self::Source(_) => ErrorClass::Io,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Config(err) => err.origin(),
            Self::Search(_) => ErrorOrigin::Search,
            Self::IndexOutOfRange { .. } => ErrorOrigin::Store,
            Self::Source(_) => ErrorOrigin::Source,
        }
    }

    /// Borrow the underlying data source error as its concrete type.
    #[must_use]
    pub fn source_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Source(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin(), self.class(), self)
    }
}

///
/// ConfigError
///
/// Construction-time failures: malformed order strings and configuration.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("order fragment {position} is empty")]
    EmptyFragment { position: usize },

    #[error("malformed order fragment '{fragment}'")]
    MalformedFragment { fragment: String },

    #[error("unknown order direction '{direction}' in '{fragment}'")]
    UnknownDirection { fragment: String, direction: String },

    #[error("unknown order field '{field}' on entity '{entity}'")]
    UnknownField { field: String, entity: String },

    #[error("order field '{field}' appears multiple times")]
    DuplicateField { field: String },

    #[error("primary key name must not be empty")]
    EmptyPrimaryKey,

    #[error("preload count must be at least 1, got {count}")]
    InvalidPreloadCount { count: usize },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config read error for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::EmptyFragment { .. }
            | Self::MalformedFragment { .. }
            | Self::UnknownDirection { .. }
            | Self::UnknownField { .. }
            | Self::DuplicateField { .. }
            | Self::EmptyPrimaryKey => ErrorOrigin::Order,
            Self::InvalidPreloadCount { .. } | Self::Toml(_) | Self::Io { .. } => {
                ErrorOrigin::Config
            }
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Config,
    Unsupported,
    InvariantViolation,
    Io,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::Io => "io",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime error attribution.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Order,
    Store,
    Search,
    Source,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Order => "order",
            Self::Store => "store",
            Self::Search => "search",
            Self::Source => "source",
        };
        write!(f, "{label}")
    }
}
