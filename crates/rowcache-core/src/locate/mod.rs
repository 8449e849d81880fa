//! Entity locator: binary search over a partially materialized store.
//!
//! Each probe fills at most one slot (the store runs under a preload scope
//! of 1), so relocating an entity costs O(log n) single-row fetches no matter
//! how little of the store is cached.
//!
//! A `None` result is expected whenever the entity is absent from the
//! generation, including when its ordering values were edited since the
//! caller last saw it.


use crate::{
    error::Error,
    obs::sink::{MetricsEvent, record},
    source::DataSource,
    store::RowStore,
    traits::EntityKind,
};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Current index of `target` within `store`, or `None` if it is not there.
///
/// The store's order must be the order its rows are actually sorted by.
/// A missing probe row aborts the search with `None`: narrowing away from a
/// hole in the result set is unsafe.
pub fn locate<S: DataSource>(
    store: &mut RowStore<S>,
    target: &S::Entity,
) -> Result<Option<usize>, Error> {
    let entity_path = <S::Entity as EntityKind>::MODEL.path;

    if store.is_empty() {
        record(MetricsEvent::LocateFinish {
            entity_path,
            probes: 0,
            found: false,
        });
        return Ok(None);
    }

    let order = store.order().clone();
    let boundary = order.boundary(target);
    let mut probes = 0_u64;

    let found = store.with_preload_scope(1, |store| -> Result<Option<usize>, Error> {
        let mut low = 0;
        let mut high = store.row_count();

        while low < high {
            let mid = low + (high - low) / 2;
            probes += 1;

            let Some(probe) = store.get_slot(mid)? else {
                debug!(entity = entity_path, slot = mid, "locate aborted on missing row");
                return Ok(None);
            };

            let ordering = order.compare_to_boundary(probe, &boundary);
            trace!(entity = entity_path, slot = mid, ?ordering, "locate probe");

            match ordering {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
                Ordering::Equal => return Ok(Some(mid)),
            }
        }

        Ok(None)
    })?;

    record(MetricsEvent::LocateFinish {
        entity_path,
        probes,
        found: found.is_some(),
    });
    debug!(
        entity = entity_path,
        probes,
        index = ?found,
        generation = store.generation(),
        "locate finished"
    );

    Ok(found)
}
