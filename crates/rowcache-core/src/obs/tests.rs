use crate::obs::{EventState, MetricsEvent, metrics_report, metrics_reset_all, sink::record};

#[test]
fn global_sink_accumulates_into_event_state() {
    metrics_reset_all();

    record(MetricsEvent::PageFetch {
        entity_path: "obs::Row",
        requested: 20,
        returned: 12,
        filled: 10,
    });
    record(MetricsEvent::Renew {
        entity_path: "obs::Row",
    });

    let report: EventState = metrics_report();
    assert_eq!(report.ops.page_fetches, 1);
    assert_eq!(report.ops.rows_requested, 20);
    assert_eq!(report.ops.rows_returned, 12);
    assert_eq!(report.ops.slots_filled, 10);
    assert_eq!(report.ops.renewals, 1);
    assert_eq!(report.entities["obs::Row"].slots_filled, 10);

    metrics_reset_all();
    assert_eq!(metrics_report().ops, EventState::default().ops);
}
