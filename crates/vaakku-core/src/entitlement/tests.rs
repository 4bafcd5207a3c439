//! Tests for entitlement module

use super::*;
use crate::storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;

fn tracker() -> (Arc<MemoryStore>, EntitlementTracker) {
    let store = Arc::new(MemoryStore::new());
    let tracker = EntitlementTracker::new(store.clone());
    (store, tracker)
}

fn tracker_with(raw: &str) -> EntitlementTracker {
    let store = Arc::new(MemoryStore::with_entries([(ANONYMOUS_USAGE_KEY, raw)]));
    EntitlementTracker::new(store)
}

#[test]
fn test_fresh_state_has_full_quota() {
    let (_, tracker) = tracker();
    for feature in Feature::ALL {
        assert_eq!(tracker.remaining(feature), feature.anonymous_limit());
        assert!(!tracker.is_exhausted(feature));
    }
}

#[test]
fn test_record_attempt_arithmetic() {
    for feature in Feature::ALL {
        let (_, tracker) = tracker();
        let limit = tracker.limit(feature);

        for calls in 1..=limit + 3 {
            tracker.record_attempt(feature);
            let expected = limit - calls.min(limit);
            assert_eq!(tracker.remaining(feature), expected);
            assert!(tracker.usage(feature) <= limit);
        }
    }
}

#[test]
fn test_features_are_independent() {
    let (_, tracker) = tracker();
    tracker.record_attempt(Feature::Tts);
    tracker.record_attempt(Feature::Tts);

    assert_eq!(tracker.remaining(Feature::Tts), 1);
    assert_eq!(tracker.remaining(Feature::Stt), 2);
    assert_eq!(tracker.remaining(Feature::Translate), 3);
}

#[test]
fn test_tts_scenario_three_successes_exhaust() {
    let (_, tracker) = tracker();
    assert_eq!(tracker.state(Feature::Tts), QuotaState::Available { remaining: 3 });

    tracker.record_attempt(Feature::Tts);
    tracker.record_attempt(Feature::Tts);
    assert_eq!(tracker.state(Feature::Tts), QuotaState::Available { remaining: 1 });

    tracker.record_attempt(Feature::Tts);
    assert_eq!(tracker.remaining(Feature::Tts), 0);
    assert!(tracker.is_exhausted(Feature::Tts));
    assert_eq!(tracker.state(Feature::Tts), QuotaState::Exhausted);
}

#[test]
fn test_stt_scenario_server_reconciliation() {
    let (_, tracker) = tracker();
    tracker.record_attempt(Feature::Stt);
    assert_eq!(tracker.usage(Feature::Stt), 1);

    // Another tab spent the last attempt; the server says so
    tracker.force_exhaust(Feature::Stt);
    assert_eq!(tracker.remaining(Feature::Stt), 0);
    assert_eq!(tracker.usage(Feature::Stt), 2);
}

#[test]
fn test_force_exhaust_is_sticky() {
    let (_, tracker) = tracker();
    tracker.force_exhaust(Feature::Translate);

    for _ in 0..3 {
        tracker.force_exhaust(Feature::Translate);
        tracker.record_attempt(Feature::Translate);
        assert_eq!(tracker.remaining(Feature::Translate), 0);
    }
}

#[test]
fn test_force_exhaust_at_limit_is_noop() {
    let (store, tracker) = tracker();
    for _ in 0..3 {
        tracker.record_attempt(Feature::Tts);
    }
    let before = store.get(ANONYMOUS_USAGE_KEY).unwrap();

    tracker.force_exhaust(Feature::Tts);

    assert_eq!(store.get(ANONYMOUS_USAGE_KEY).unwrap(), before);
    assert_eq!(tracker.usage(Feature::Tts), 3);
}

#[test]
fn test_corrupt_state_is_fresh() {
    for raw in ["", "not json", "[1,2,3]", "null", "42", r#"{"tts":"abc","stt":null}"#] {
        let tracker = tracker_with(raw);
        for feature in Feature::ALL {
            assert_eq!(
                tracker.remaining(feature),
                feature.anonymous_limit(),
                "raw = {raw:?}"
            );
        }
    }
}

#[test]
fn test_lenient_counter_parsing() {
    let tracker = tracker_with(r#"{"tts":"2","stt":-4,"translate":1.9}"#);
    assert_eq!(tracker.usage(Feature::Tts), 2);
    assert_eq!(tracker.usage(Feature::Stt), 0);
    assert_eq!(tracker.usage(Feature::Translate), 1);
}

#[test]
fn test_stored_counts_clamped_to_limit() {
    let tracker = tracker_with(r#"{"tts":99}"#);
    assert_eq!(tracker.usage(Feature::Tts), 3);
    assert!(tracker.is_exhausted(Feature::Tts));
}

#[test]
fn test_recording_over_corrupt_state_repairs_it() {
    let store = Arc::new(MemoryStore::with_entries([(ANONYMOUS_USAGE_KEY, "{oops")]));
    let tracker = EntitlementTracker::new(store.clone());

    tracker.record_attempt(Feature::Translate);

    let raw = store.get(ANONYMOUS_USAGE_KEY).unwrap().unwrap();
    let stored: UsageCounters = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        stored,
        UsageCounters {
            tts: 0,
            stt: 0,
            translate: 1
        }
    );
}

#[test]
fn test_state_is_shared_through_storage() {
    let store = Arc::new(MemoryStore::new());
    let first = EntitlementTracker::new(store.clone());
    let second = EntitlementTracker::new(store.clone());

    first.record_attempt(Feature::Stt);
    assert_eq!(second.remaining(Feature::Stt), 1);

    second.force_exhaust(Feature::Stt);
    assert!(first.is_exhausted(Feature::Stt));
}
