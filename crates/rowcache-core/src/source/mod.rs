//! Data source boundary.
//!
//! The cache only ever talks to a backend through `DataSource`. Filters are
//! passed through opaquely; ordering is expressed as an `OrderSpec`; the
//! backend decides how either becomes a query.

mod memory;


use crate::{order::OrderSpec, predicate::Predicate, traits::Entity};

// re-exports
pub use memory::{MemorySource, MemorySourceError, MemorySourceStats};

///
/// DataSource
///
/// Capability set consumed by stores and searchers. Every call may block.
///
/// Offsets and limits follow SQL `OFFSET`/`LIMIT` semantics; callers
/// normalize negative indices before reaching this boundary. Sources must
/// never yield null rows.
///

pub trait DataSource {
    type Entity: Entity;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of rows matching `filter`.
    fn count(&self, filter: &Predicate) -> Result<usize, Self::Error>;

    /// One page of rows matching `filter`, ordered by `order`.
    fn fetch_page(
        &self,
        filter: &Predicate,
        order: &OrderSpec,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Self::Entity>, Self::Error>;

    /// First `limit` rows matching `predicate` under `order`.
    fn fetch_matching(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        limit: usize,
    ) -> Result<Vec<Self::Entity>, Self::Error>;
}
