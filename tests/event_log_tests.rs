#![allow(missing_docs)]

use evo_arena::simulation::event_log::{DEFAULT_CAPACITY, EventKind, EventLog};

#[test]
fn test_oldest_entries_are_evicted() {
    let mut log = EventLog::with_capacity(3);
    for i in 0..5u8 {
        log.record(f32::from(i), EventKind::Birth, format!("child {i}"));
    }

    assert_eq!(log.len(), 3);
    let times: Vec<f32> = log.recent().map(|e| e.time).collect();
    assert_eq!(times, vec![4.0, 3.0, 2.0]);
    assert_eq!(log.latest().map(|e| e.description.as_str()), Some("child 4"));
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut log = EventLog::with_capacity(0);
    log.record(1.0, EventKind::Death, "gone");
    assert!(log.is_empty());
    assert!(log.latest().is_none());
}

#[test]
fn test_default_capacity() {
    let mut log = EventLog::default();
    for i in 0..30u8 {
        log.record(f32::from(i), EventKind::Generation, "next");
    }
    assert_eq!(log.len(), DEFAULT_CAPACITY);
    assert_eq!(EventKind::Generation.tag(), "gen");
}
