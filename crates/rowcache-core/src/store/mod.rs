//! Row store: the sparse, lazily filled cache a grid view indexes into.
//!
//! One store is one *generation*: the row count and the meaning of every
//! index are fixed when the store is counted and never change in place,
//! except through `remove`. Filter changes and reloads build a fresh
//! generation with `renew`.

mod scope;

#[cfg(test)]
mod tests;

use crate::{
    DEFAULT_PRELOAD_COUNT,
    config::StoreConfig,
    error::Error,
    locate,
    obs::sink::{MetricsEvent, record},
    order::OrderSpec,
    predicate::Predicate,
    search::{SearchCriteria, TextSearcher},
    source::DataSource,
    traits::EntityKind,
};
use std::rc::Rc;
use tracing::debug;

// re-exports
pub use scope::PreloadScope;

///
/// RowStore
///

pub struct RowStore<S: DataSource> {
    source: Rc<S>,
    filter: Predicate,
    order: OrderSpec,
    slots: Vec<Option<S::Entity>>,
    preload_count: usize,
    generation: u64,
}

impl<S: DataSource> RowStore<S> {
    /// Count the rows matching `filter` and allocate that many empty slots.
    /// No rows are fetched.
    pub fn new(
        source: Rc<S>,
        filter: Predicate,
        order: OrderSpec,
        preload_count: usize,
    ) -> Result<Self, Error> {
        let row_count = source.count(&filter).map_err(Error::from_source)?;

        record(MetricsEvent::CountQuery {
            entity_path: Self::entity_path(),
            rows: row_count as u64,
        });
        debug!(
            entity = Self::entity_path(),
            row_count,
            order = %order,
            "counted row store generation"
        );

        let mut slots = Vec::new();
        slots.resize_with(row_count, || None);

        Ok(Self {
            source,
            filter,
            order,
            slots,
            preload_count: preload_count.max(1),
            generation: 0,
        })
    }

    /// Construct with the default preload count.
    pub fn open(source: Rc<S>, filter: Predicate, order: OrderSpec) -> Result<Self, Error> {
        Self::new(source, filter, order, DEFAULT_PRELOAD_COUNT)
    }

    /// Construct from explicit store configuration; the order string is
    /// parsed against the entity model.
    pub fn from_config(
        source: Rc<S>,
        filter: Predicate,
        config: &StoreConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        let order = OrderSpec::parse(&config.order, <S::Entity as EntityKind>::MODEL)?;

        Self::new(source, filter, order, config.preload_count)
    }

    const fn entity_path() -> &'static str {
        <S::Entity as EntityKind>::MODEL.path
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the slot at `index` is filled. Never fetches.
    /// Negative indices count from the end; out-of-range indices are `false`.
    #[must_use]
    pub fn cached_at(&self, index: isize) -> bool {
        self.normalize_index(index)
            .is_some_and(|slot| self.slots[slot].is_some())
    }

    /// Number of filled slots.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub const fn preload_count(&self) -> usize {
        self.preload_count
    }

    /// Set the page size used to fill cache misses (at least 1).
    pub fn set_preload_count(&mut self, count: usize) {
        self.preload_count = count.max(1);
    }

    #[must_use]
    pub const fn order(&self) -> &OrderSpec {
        &self.order
    }

    #[must_use]
    pub const fn filter(&self) -> &Predicate {
        &self.filter
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn source(&self) -> &Rc<S> {
        &self.source
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Row at `index`, fetching a page of `preload_count` rows on a miss.
    ///
    /// Negative indices count from the end. `Ok(None)` means the source
    /// returned fewer rows than this generation counted: the row is missing.
    pub fn get(&mut self, index: isize) -> Result<Option<&S::Entity>, Error> {
        let slot = self
            .normalize_index(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                row_count: self.row_count(),
            })?;

        self.get_slot(slot)
    }

    // Row at an already-normalized slot index.
    pub(crate) fn get_slot(&mut self, slot: usize) -> Result<Option<&S::Entity>, Error> {
        if self.slots[slot].is_some() {
            record(MetricsEvent::CacheHit {
                entity_path: Self::entity_path(),
            });
        } else {
            self.fill_window(slot, self.preload_count)?;

            if self.slots[slot].is_none() {
                record(MetricsEvent::MissingRow {
                    entity_path: Self::entity_path(),
                });
                debug!(
                    entity = Self::entity_path(),
                    slot,
                    generation = self.generation,
                    "row missing from source"
                );
            }
        }

        Ok(self.slots[slot].as_ref())
    }

    /// Fill every unfetched slot in `[start, start + count)`, one fetch per
    /// contiguous unfetched run. Returns the number of slots filled.
    pub fn preload(&mut self, start: usize, count: usize) -> Result<usize, Error> {
        let end = start.saturating_add(count).min(self.row_count());
        let mut filled = 0;
        let mut cursor = start;

        while cursor < end {
            if self.slots[cursor].is_some() {
                cursor += 1;
                continue;
            }

            let run_end = (cursor..end)
                .find(|&slot| self.slots[slot].is_some())
                .unwrap_or(end);
            filled += self.fill_window(cursor, run_end - cursor)?;
            cursor = run_end;
        }

        Ok(filled)
    }

    /// Run `f` with the preload count temporarily set to `count`.
    /// The previous count is restored on every exit, including unwind.
    pub fn with_preload_scope<T>(&mut self, count: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut scope = PreloadScope::enter(self, count);

        f(&mut *scope)
    }

    // Fetch one forward page starting at `start` and fill empty slots only.
    fn fill_window(&mut self, start: usize, limit: usize) -> Result<usize, Error> {
        let limit = limit.min(self.row_count() - start);
        let page = self
            .source
            .fetch_page(&self.filter, &self.order, start, limit)
            .map_err(Error::from_source)?;
        let returned = page.len();

        let mut filled = 0;
        for (slot, entity) in self.slots[start..].iter_mut().zip(page.into_iter().take(limit)) {
            if slot.is_none() {
                *slot = Some(entity);
                filled += 1;
            }
        }

        record(MetricsEvent::PageFetch {
            entity_path: Self::entity_path(),
            requested: limit as u64,
            returned: returned as u64,
            filled: filled as u64,
        });
        debug!(
            entity = Self::entity_path(),
            offset = start,
            limit,
            returned,
            filled,
            "fetched page"
        );

        Ok(filled)
    }

    fn normalize_index(&self, index: isize) -> Option<usize> {
        let row_count = self.row_count();
        let slot = if index < 0 {
            row_count.checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };

        (slot < row_count).then_some(slot)
    }

    // ------------------------------------------------------------------
    // Generations
    // ------------------------------------------------------------------

    /// Build the next generation with `filter` and the same order.
    /// `self` is never touched; on failure it stays valid.
    pub fn renew(&self, filter: Predicate) -> Result<Self, Error> {
        let mut next = Self::new(
            Rc::clone(&self.source),
            filter,
            self.order.clone(),
            self.preload_count,
        )?;
        next.generation = self.generation + 1;

        record(MetricsEvent::Renew {
            entity_path: Self::entity_path(),
        });
        debug!(
            entity = Self::entity_path(),
            generation = next.generation,
            previous_rows = self.row_count(),
            rows = next.row_count(),
            "renewed row store"
        );

        Ok(next)
    }

    /// Renew with the current filter, picking up external table changes.
    pub fn reload(&self) -> Result<Self, Error> {
        self.renew(self.filter.clone())
    }

    /// Drop the row at `index` after the caller deleted it from the backing
    /// table. Later slots shift down by one and the generation advances.
    pub fn remove(&mut self, index: isize) -> Result<Option<S::Entity>, Error> {
        let slot = self
            .normalize_index(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                row_count: self.row_count(),
            })?;

        let removed = self.slots.remove(slot);
        self.generation += 1;

        record(MetricsEvent::Remove {
            entity_path: Self::entity_path(),
        });
        debug!(
            entity = Self::entity_path(),
            slot,
            rows = self.row_count(),
            "removed row"
        );

        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Locate / search
    // ------------------------------------------------------------------

    /// Current index of `entity` in this generation, if present.
    pub fn index_for_entity(&mut self, entity: &S::Entity) -> Result<Option<usize>, Error> {
        locate::locate(self, entity)
    }

    /// Searcher over the same source, order and filter as this store.
    #[must_use]
    pub fn searcher(&self) -> TextSearcher<S> {
        TextSearcher::new(Rc::clone(&self.source), self.order.clone())
            .with_filter(self.filter.clone())
    }

    /// Search for the next match and locate it in this generation.
    /// Returns the match's index together with the entity.
    pub fn search(
        &mut self,
        field: &str,
        criteria: &SearchCriteria,
        start: Option<&S::Entity>,
    ) -> Result<Option<(usize, S::Entity)>, Error> {
        let Some(found) = self.searcher().search(field, criteria, start)? else {
            return Ok(None);
        };

        Ok(self.index_for_entity(&found)?.map(|index| (index, found)))
    }
}
