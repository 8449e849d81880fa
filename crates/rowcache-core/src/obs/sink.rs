//! Metrics sink boundary.
//!
//! Core cache logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between cache logic
//! and the thread-local metrics state.
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    CountQuery {
        entity_path: &'static str,
        rows: u64,
    },
    PageFetch {
        entity_path: &'static str,
        requested: u64,
        returned: u64,
        filled: u64,
    },
    MatchQuery {
        entity_path: &'static str,
        returned: u64,
    },
    CacheHit {
        entity_path: &'static str,
    },
    MissingRow {
        entity_path: &'static str,
    },
    LocateFinish {
        entity_path: &'static str,
        probes: u64,
        found: bool,
    },
    Search {
        entity_path: &'static str,
        hit: bool,
    },
    Renew {
        entity_path: &'static str,
    },
    Remove {
        entity_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::CountQuery { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.count_queries = m.ops.count_queries.saturating_add(1);
                });
            }

            MetricsEvent::PageFetch {
                entity_path,
                requested,
                returned,
                filled,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.page_fetches = m.ops.page_fetches.saturating_add(1);
                    m.ops.rows_requested = m.ops.rows_requested.saturating_add(requested);
                    m.ops.rows_returned = m.ops.rows_returned.saturating_add(returned);
                    m.ops.slots_filled = m.ops.slots_filled.saturating_add(filled);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.page_fetches = entry.page_fetches.saturating_add(1);
                    entry.slots_filled = entry.slots_filled.saturating_add(filled);
                });
            }

            MetricsEvent::MatchQuery { returned, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.match_queries = m.ops.match_queries.saturating_add(1);
                    m.ops.rows_returned = m.ops.rows_returned.saturating_add(returned);
                });
            }

            MetricsEvent::CacheHit { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_hits = m.ops.cache_hits.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.cache_hits = entry.cache_hits.saturating_add(1);
                });
            }

            MetricsEvent::MissingRow { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.missing_rows = m.ops.missing_rows.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.missing_rows = entry.missing_rows.saturating_add(1);
                });
            }

            MetricsEvent::LocateFinish {
                entity_path,
                probes,
                found,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.locate_calls = m.ops.locate_calls.saturating_add(1);
                    m.ops.locate_probes = m.ops.locate_probes.saturating_add(probes);
                    if found {
                        m.ops.locate_found = m.ops.locate_found.saturating_add(1);
                    } else {
                        m.ops.locate_not_found = m.ops.locate_not_found.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.locate_probes = entry.locate_probes.saturating_add(probes);
                });
            }

            MetricsEvent::Search { entity_path, hit } => {
                metrics::with_state_mut(|m| {
                    m.ops.search_calls = m.ops.search_calls.saturating_add(1);
                    if hit {
                        m.ops.search_hits = m.ops.search_hits.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.search_calls = entry.search_calls.saturating_add(1);
                });
            }

            MetricsEvent::Renew { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.renewals = m.ops.renewals.saturating_add(1);
                });
            }

            MetricsEvent::Remove { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.removals = m.ops.removals.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // Clone the override out so a sink may itself record without a
    // re-entrant borrow of the slot.
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
