//! Integration tests for the event channel and task tracker

use launchcore_events::{channel, InstallEvent, TaskStatus, TaskTracker};
use proptest::prelude::*;

#[tokio::test]
async fn test_event_channel_round_trip() {
    let (tx, mut rx) = channel();
    tx.send(InstallEvent::StepStarted {
        id: 0,
        label: "resolve-metadata".into(),
    })
    .unwrap();

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, InstallEvent::StepStarted { id: 0, .. }));
}

#[tokio::test]
async fn test_listener_receives_snapshot_per_change() {
    let tracker = TaskTracker::new();
    let mut rx = tracker.subscribe();

    // Initial snapshot for late-subscriber consistency.
    assert_eq!(rx.recv().await.unwrap().len(), 0);

    let record = tracker.append("download-artifact:client").unwrap();
    tracker
        .update(record.id, TaskStatus::Running, Some(0.0))
        .unwrap();
    tracker
        .update(record.id, TaskStatus::Completed, Some(1.0))
        .unwrap();

    let after_append = rx.recv().await.unwrap();
    assert_eq!(after_append[0].status, TaskStatus::Pending);

    let after_start = rx.recv().await.unwrap();
    assert_eq!(after_start[0].status, TaskStatus::Running);

    // Causal order: Running is observed before the terminal snapshot.
    let after_complete = rx.recv().await.unwrap();
    assert_eq!(after_complete[0].status, TaskStatus::Completed);
    assert_eq!(after_complete[0].progress, Some(1.0));
}

#[tokio::test]
async fn test_dropped_listener_does_not_block_updates() {
    let tracker = TaskTracker::new();
    let rx = tracker.subscribe();
    drop(rx);

    let record = tracker.append("resolve-metadata").unwrap();
    tracker
        .update(record.id, TaskStatus::Running, None)
        .unwrap();

    let mut live = tracker.subscribe();
    assert_eq!(
        live.recv().await.unwrap()[0].status,
        TaskStatus::Running
    );
}

#[test]
fn test_event_serialization_is_tagged() {
    let event = InstallEvent::StepProgress {
        id: 3,
        label: "download-artifact:client".into(),
        fraction: 0.4,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"step_progress\""));
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::Running),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Failed),
        Just(TaskStatus::Cancelled),
    ]
}

proptest! {
    /// For any sequence of requested updates, the accepted status sequence
    /// is monotonic: never backwards, never out of a terminal status.
    #[test]
    fn prop_status_sequence_is_monotonic(updates in prop::collection::vec(arb_status(), 0..32)) {
        let tracker = TaskTracker::new();
        let record = tracker.append("download-artifact:client").unwrap();

        let mut accepted = vec![TaskStatus::Pending];
        for status in updates {
            if tracker.update(record.id, status, None).is_ok() {
                accepted.push(status);
            }
        }

        for pair in accepted.windows(2) {
            prop_assert!(pair[0].can_transition_to(pair[1]));
        }

        // The tracker's final state is whatever was last accepted.
        prop_assert_eq!(tracker.snapshot()[0].status, *accepted.last().unwrap());
    }
}
