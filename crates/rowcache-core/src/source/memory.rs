use crate::{
    order::OrderSpec,
    predicate::{Predicate, eval},
    source::DataSource,
    traits::Entity,
};
use std::cell::{Cell, RefCell};
use thiserror::Error as ThisError;

///
/// MemorySourceError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MemorySourceError {
    #[error("memory source is offline")]
    Offline,
}

///
/// MemorySourceStats
/// Round trips served since construction.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemorySourceStats {
    pub count_calls: u64,
    pub page_calls: u64,
    pub match_calls: u64,
}

///
/// MemorySource
///
/// In-process backend over an owned row list. Every query scans, filters and
/// sorts the full list, the way a table without indexes would.
///
/// Rows can be inserted, updated and removed between cache generations to
/// stand in for external table changes.
///

#[derive(Debug, Default)]
pub struct MemorySource<E> {
    rows: RefCell<Vec<E>>,
    stats: Cell<MemorySourceStats>,
    offline: Cell<bool>,
}

impl<E: Entity> MemorySource<E> {
    #[must_use]
    pub fn new(rows: Vec<E>) -> Self {
        Self {
            rows: RefCell::new(rows),
            stats: Cell::new(MemorySourceStats::default()),
            offline: Cell::new(false),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    pub fn insert(&self, row: E) {
        self.rows.borrow_mut().push(row);
    }

    /// Keep only rows for which `keep` returns true.
    pub fn retain(&self, keep: impl FnMut(&E) -> bool) {
        self.rows.borrow_mut().retain(keep);
    }

    /// Apply `update` to every row; returns how many rows `update` reported changed.
    pub fn update(&self, update: impl FnMut(&mut E) -> bool) -> usize {
        self.rows
            .borrow_mut()
            .iter_mut()
            .map(update)
            .filter(|changed| *changed)
            .count()
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    #[must_use]
    pub fn stats(&self) -> MemorySourceStats {
        self.stats.get()
    }

    fn check_online(&self) -> Result<(), MemorySourceError> {
        if self.offline.get() {
            Err(MemorySourceError::Offline)
        } else {
            Ok(())
        }
    }

    fn bump(&self, f: impl FnOnce(&mut MemorySourceStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    // Filter and sort a snapshot of the rows.
    fn select(&self, predicate: &Predicate, order: &OrderSpec) -> Vec<E> {
        let mut rows: Vec<E> = self
            .rows
            .borrow()
            .iter()
            .filter(|row| eval(predicate, *row))
            .cloned()
            .collect();
        rows.sort_by(|left, right| order.compare(left, right));

        rows
    }
}

impl<E: Entity> DataSource for MemorySource<E> {
    type Entity = E;
    type Error = MemorySourceError;

    fn count(&self, filter: &Predicate) -> Result<usize, Self::Error> {
        self.bump(|stats| stats.count_calls += 1);
        self.check_online()?;

        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|row| eval(filter, *row))
            .count())
    }

    fn fetch_page(
        &self,
        filter: &Predicate,
        order: &OrderSpec,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<E>, Self::Error> {
        self.bump(|stats| stats.page_calls += 1);
        self.check_online()?;

        Ok(self
            .select(filter, order)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn fetch_matching(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        limit: usize,
    ) -> Result<Vec<E>, Self::Error> {
        self.bump(|stats| stats.match_calls += 1);
        self.check_online()?;

        let mut rows = self.select(predicate, order);
        rows.truncate(limit);

        Ok(rows)
    }
}
