use crate::{
    config::StoreConfig,
    error::{ConfigError, Error, ErrorClass, ErrorOrigin},
    obs::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink},
    predicate::Predicate,
    source::{DataSource, MemorySource, MemorySourceError},
    store::RowStore,
    test_support::{Person, people_source, person_order},
};
use std::{
    cell::RefCell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

type PersonStore = RowStore<MemorySource<Person>>;

fn build(
    rows: usize,
    filter: Predicate,
    order: &str,
    preload: usize,
) -> (Rc<MemorySource<Person>>, PersonStore) {
    let source = people_source(rows);
    let store = RowStore::new(Rc::clone(&source), filter, person_order(order), preload)
        .expect("store should count");

    (source, store)
}

fn id_at(store: &mut PersonStore, index: isize) -> i64 {
    store
        .get(index)
        .expect("get should succeed")
        .expect("row should be present")
        .id
}

fn cached_slots(store: &PersonStore) -> Vec<usize> {
    (0..store.row_count())
        .filter(|&slot| store.cached_at(isize::try_from(slot).unwrap()))
        .collect()
}

// ------------------------------------------------------------------
// Construction
// ------------------------------------------------------------------

#[test]
fn construction_counts_without_fetching() {
    let (source, store) = build(100, Predicate::True, "nationality", 20);

    assert_eq!(store.row_count(), 100);
    assert_eq!(store.cached_count(), 0);
    assert_eq!(source.stats().count_calls, 1);
    assert_eq!(source.stats().page_calls, 0);
}

#[test]
fn row_count_matches_source_count_for_any_filter() {
    let filters = [
        Predicate::True,
        Predicate::False,
        Predicate::eq("nationality", "UAE"),
        Predicate::gt("age", 40),
        Predicate::is_null("city"),
        Predicate::contains_ci("name", "silva"),
    ];

    for filter in filters {
        let (source, store) = build(100, filter.clone(), "", 20);

        assert_eq!(
            store.row_count(),
            source.count(&filter).unwrap(),
            "filter {filter:?}"
        );
    }
}

#[test]
fn empty_result_set() {
    let (_, mut store) = build(30, Predicate::False, "", 20);

    assert!(store.is_empty());
    assert!(!store.cached_at(0));
    assert!(matches!(
        store.get(0),
        Err(Error::IndexOutOfRange {
            index: 0,
            row_count: 0
        })
    ));
}

#[test]
fn from_config_parses_order_and_preload() {
    let source = people_source(10);
    let config = StoreConfig {
        preload_count: 4,
        order: "nationality desc".to_string(),
    };

    let store = RowStore::from_config(source, Predicate::True, &config).unwrap();

    assert_eq!(store.preload_count(), 4);
    assert_eq!(store.order().to_string(), "nationality DESC, id ASC");
}

#[test]
fn from_config_rejects_invalid_config() {
    let zero = StoreConfig {
        preload_count: 0,
        ..StoreConfig::default()
    };
    let err = RowStore::from_config(people_source(10), Predicate::True, &zero)
        .err()
        .expect("zero preload must fail");
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidPreloadCount { count: 0 })
    ));
    assert_eq!(err.origin(), ErrorOrigin::Config);

    let unknown = StoreConfig {
        order: "height".to_string(),
        ..StoreConfig::default()
    };
    let err = RowStore::from_config(people_source(10), Predicate::True, &unknown)
        .err()
        .expect("unknown field must fail");
    assert_eq!(err.class(), ErrorClass::Config);
    assert_eq!(err.origin(), ErrorOrigin::Order);
}

#[test]
fn preload_count_is_at_least_one() {
    let (_, mut store) = build(10, Predicate::True, "", 0);
    assert_eq!(store.preload_count(), 1);

    store.set_preload_count(0);
    assert_eq!(store.preload_count(), 1);

    store.set_preload_count(7);
    assert_eq!(store.preload_count(), 7);
}

// ------------------------------------------------------------------
// Lazy fill
// ------------------------------------------------------------------

#[test]
fn get_fills_one_forward_window() {
    let (_, mut store) = build(100, Predicate::True, "nationality", 20);

    store.get(30).unwrap();

    assert_eq!(cached_slots(&store), (30..50).collect::<Vec<_>>());
}

#[test]
fn window_is_clamped_at_the_end() {
    let (source, mut store) = build(100, Predicate::True, "", 20);

    store.get(95).unwrap();

    assert_eq!(cached_slots(&store), (95..100).collect::<Vec<_>>());
    assert_eq!(source.stats().page_calls, 1);
}

#[test]
fn repeated_get_is_served_from_cache() {
    metrics_reset_all();
    let (source, mut store) = build(100, Predicate::True, "nationality", 20);

    let first = store.get(7).unwrap().cloned();
    let second = store.get(7).unwrap().cloned();
    store.get(12).unwrap();

    assert_eq!(first, second);
    assert!(first.is_some());
    assert_eq!(source.stats().page_calls, 1);

    let report = metrics_report();
    assert_eq!(report.ops.page_fetches, 1);
    assert_eq!(report.ops.cache_hits, 2);
    assert_eq!(report.ops.slots_filled, 20);
}

#[test]
fn fill_never_overwrites_cached_slots() {
    let (source, mut store) = build(40, Predicate::True, "", 20);

    let before = store.get(10).unwrap().cloned().unwrap();
    source.update(|row| {
        row.name = format!("{} (edited)", row.name);
        true
    });

    // fills 0..20; slots 10..20 were already cached
    store.get(0).unwrap();

    assert_eq!(store.get(10).unwrap(), Some(&before));
    assert!(
        store
            .get(0)
            .unwrap()
            .is_some_and(|row| row.name.ends_with("(edited)"))
    );
}

#[test]
fn negative_index_counts_from_the_end() {
    let (_, mut store) = build(100, Predicate::True, "nationality", 20);

    let last = id_at(&mut store, 99);
    assert_eq!(id_at(&mut store, -1), last);
    assert_eq!(id_at(&mut store, -100), id_at(&mut store, 0));
    assert!(store.cached_at(-1));

    assert!(matches!(
        store.get(-101),
        Err(Error::IndexOutOfRange { index: -101, .. })
    ));
    assert!(matches!(
        store.get(100),
        Err(Error::IndexOutOfRange { index: 100, .. })
    ));
}

#[test]
fn rows_follow_store_order() {
    let (_, mut store) = build(100, Predicate::True, "nationality", 20);

    assert_eq!(store.get(0).unwrap().unwrap().nationality, "BRA");
    assert_eq!(store.get(20).unwrap().unwrap().nationality, "FRA");
    assert_eq!(store.get(40).unwrap().unwrap().nationality, "UAE");
    assert_eq!(store.get(80).unwrap().unwrap().nationality, "USA");
    assert_eq!(id_at(&mut store, 0), 2);
    assert_eq!(id_at(&mut store, 1), 7);
}

#[test]
fn rows_deleted_after_count_are_missing() {
    metrics_reset_all();
    let (source, mut store) = build(20, Predicate::True, "", 5);

    source.retain(|row| row.id < 18);

    assert!(store.get(17).unwrap().is_some());
    assert_eq!(store.get(18).unwrap(), None);
    assert_eq!(store.get(19).unwrap(), None);
    assert!(!store.cached_at(18));
    assert_eq!(metrics_report().ops.missing_rows, 2);
}

#[test]
fn source_errors_propagate() {
    let (source, mut store) = build(20, Predicate::True, "", 5);
    source.set_offline(true);

    let err = store.get(0).unwrap_err();

    assert_eq!(err.class(), ErrorClass::Io);
    assert_eq!(err.origin(), ErrorOrigin::Source);
    assert_eq!(
        err.source_error::<MemorySourceError>(),
        Some(&MemorySourceError::Offline)
    );
    assert_eq!(store.cached_count(), 0);
}

// ------------------------------------------------------------------
// Preload
// ------------------------------------------------------------------

#[test]
fn preload_fetches_each_unfetched_run_once() {
    let (source, mut store) = build(30, Predicate::True, "", 2);

    store.get(5).unwrap();
    assert_eq!(source.stats().page_calls, 1);

    let filled = store.preload(0, 10).unwrap();

    assert_eq!(filled, 8);
    assert_eq!(source.stats().page_calls, 3);
    assert_eq!(cached_slots(&store), (0..10).collect::<Vec<_>>());
}

#[test]
fn preload_past_end_is_clamped() {
    let (source, mut store) = build(10, Predicate::True, "", 2);

    assert_eq!(store.preload(8, 50).unwrap(), 2);
    assert_eq!(store.preload(20, 5).unwrap(), 0);
    assert_eq!(source.stats().page_calls, 1);
}

#[test]
fn preload_scope_applies_inside_block() {
    let (source, mut store) = build(100, Predicate::True, "", 20);

    store.with_preload_scope(1, |store| {
        assert_eq!(store.preload_count(), 1);
        store.get(50).unwrap();
    });

    assert_eq!(store.preload_count(), 20);
    assert_eq!(cached_slots(&store), vec![50]);
    assert_eq!(source.stats().page_calls, 1);
}

#[test]
fn preload_scope_restores_after_error() {
    let (_, mut store) = build(10, Predicate::True, "", 20);

    let result = store.with_preload_scope(1, |store| -> Result<(), Error> {
        store.get(1000)?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(store.preload_count(), 20);
}

#[test]
fn preload_scope_restores_after_panic() {
    let (_, mut store) = build(10, Predicate::True, "", 20);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        store.with_preload_scope::<()>(3, |_| panic!("block failed"));
    }));

    assert!(outcome.is_err());
    assert_eq!(store.preload_count(), 20);
}

#[test]
fn nested_preload_scopes_unwind_in_order() {
    let (_, mut store) = build(10, Predicate::True, "", 20);

    store.with_preload_scope(5, |outer| {
        outer.with_preload_scope(1, |inner| assert_eq!(inner.preload_count(), 1));
        assert_eq!(outer.preload_count(), 5);
    });

    assert_eq!(store.preload_count(), 20);
}

// ------------------------------------------------------------------
// Generations
// ------------------------------------------------------------------

#[test]
fn renew_builds_a_new_generation() {
    let (_, mut store) = build(100, Predicate::True, "nationality", 20);
    store.get(0).unwrap();

    let renewed = store
        .renew(Predicate::eq("nationality", "UAE"))
        .unwrap();

    assert_eq!(renewed.generation(), store.generation() + 1);
    assert_eq!(renewed.row_count(), 40);
    assert_eq!(renewed.cached_count(), 0);
    assert_eq!(renewed.order(), store.order());
    assert_eq!(renewed.preload_count(), store.preload_count());

    // the old generation is untouched
    assert_eq!(store.row_count(), 100);
    assert_eq!(store.cached_count(), 20);
}

#[test]
fn failed_renew_leaves_store_usable() {
    let (source, mut store) = build(50, Predicate::True, "", 10);
    let first = id_at(&mut store, 0);

    source.set_offline(true);
    assert!(store.renew(Predicate::False).is_err());

    assert_eq!(store.generation(), 0);
    assert_eq!(store.row_count(), 50);
    assert_eq!(id_at(&mut store, 0), first);
}

#[test]
fn reload_picks_up_external_changes() {
    let (source, store) = build(20, Predicate::eq("nationality", "UAE"), "", 20);
    assert_eq!(store.row_count(), 8);

    source.insert(Person::new(500, "Farid Haddad", "UAE"));
    let reloaded = store.reload().unwrap();

    assert_eq!(reloaded.row_count(), 9);
    assert_eq!(reloaded.filter(), store.filter());
}

#[test]
fn remove_shifts_later_slots_down() {
    let (source, mut store) = build(10, Predicate::True, "", 10);
    let ids: Vec<i64> = (0..10).map(|i| id_at(&mut store, i)).collect();

    let removed = store.remove(3).unwrap();
    source.retain(|row| row.id != ids[3]);

    assert_eq!(removed.map(|row| row.id), Some(ids[3]));
    assert_eq!(store.row_count(), 9);
    assert_eq!(store.generation(), 1);
    assert_eq!(id_at(&mut store, 3), ids[4]);
    assert_eq!(id_at(&mut store, -1), ids[9]);
    assert_eq!(source.stats().page_calls, 1);
}

#[test]
fn remove_out_of_range_is_an_error() {
    let (_, mut store) = build(3, Predicate::True, "", 10);

    assert!(matches!(
        store.remove(3),
        Err(Error::IndexOutOfRange { index: 3, .. })
    ));
    assert_eq!(store.generation(), 0);
}

// ------------------------------------------------------------------
// Metrics
// ------------------------------------------------------------------

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[test]
fn store_reports_through_scoped_sink() {
    metrics_reset_all();
    let sink = Rc::new(RecordingSink::default());

    with_metrics_sink(sink.clone(), || {
        let (_, mut store) = build(30, Predicate::True, "", 20);
        store.get(25).unwrap();
        store.get(25).unwrap();
    });

    let events = sink.events.borrow();
    assert!(matches!(
        events.as_slice(),
        [
            MetricsEvent::CountQuery { rows: 30, .. },
            MetricsEvent::PageFetch {
                requested: 5,
                returned: 5,
                filled: 5,
                ..
            },
            MetricsEvent::CacheHit { .. },
        ]
    ));

    // the global sink saw nothing while the override was installed
    assert_eq!(metrics_report().ops.page_fetches, 0);
}
