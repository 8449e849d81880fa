//! Core runtime for rowcache: a lazily filled, order-aware row cache that sits
//! between a grid view and a query-capable data source.
//!
//! The cache presents a fixed-length, randomly indexable sequence of entities
//! while only materializing the rows that were actually asked for. Entities
//! can be re-located after the result set changed shape (binary search over
//! the sparse cache) and searched for by text without walking the cache.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod locate;
pub mod model;
pub mod obs;
pub mod order;
pub mod predicate;
pub mod search;
pub mod source;
pub mod store;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

// re-exports
pub use error::{ConfigError, Error, ErrorClass, ErrorOrigin};

///
/// CONSTANTS
///

/// Number of rows fetched per page when a cache miss is filled.
pub const DEFAULT_PRELOAD_COUNT: usize = 20;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or sources are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{EntityModel, FieldKind, FieldModel, FieldSource, RelationModel},
        order::{OrderDirection, OrderKey, OrderSpec},
        predicate::Predicate,
        search::{SearchCriteria, SearchDirection},
        traits::{Entity, EntityKind, EntityValue},
        value::Value,
    };
}
