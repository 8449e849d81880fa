//! SQLite backend for rowcache.
//!
//! `SqliteSource` implements `rowcache_core::source::DataSource` by rendering
//! predicates and orders into parameterized SQL. The renderer also speaks a
//! Postgres dialect for callers that run statements elsewhere.
#![warn(unreachable_pub)]

pub mod config;
pub mod entity;
pub mod error;
pub mod render;
pub mod source;

// re-exports
pub use config::SqliteConfig;
pub use entity::SqlEntity;
pub use error::SqliteError;
pub use render::{QueryRenderer, SqlDialect, SqlQuery};
pub use source::SqliteSource;
