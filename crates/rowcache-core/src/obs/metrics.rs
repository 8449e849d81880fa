use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, thread-local counters for cache operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

/// Snapshot type handed to callers.
pub type EventReport = EventState;

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Source round trips
    pub count_queries: u64,
    pub page_fetches: u64,
    pub match_queries: u64,

    // Rows
    pub rows_requested: u64,
    pub rows_returned: u64,
    pub slots_filled: u64,
    pub cache_hits: u64,
    pub missing_rows: u64,

    // Locate
    pub locate_calls: u64,
    pub locate_probes: u64,
    pub locate_found: u64,
    pub locate_not_found: u64,

    // Search
    pub search_calls: u64,
    pub search_hits: u64,

    // Lifecycle
    pub renewals: u64,
    pub removals: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub page_fetches: u64,
    pub slots_filled: u64,
    pub cache_hits: u64,
    pub missing_rows: u64,
    pub locate_probes: u64,
    pub search_calls: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current state.
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}
