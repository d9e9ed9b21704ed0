//! Integration tests for StatusBoard and LogSink
//!
//! These tests verify that the shared run state correctly:
//! - Emits change events on mutations
//! - Supports multiple subscribers
//! - Handles concurrent access from multiple tasks without torn snapshots
//! - Keeps log ids dense and ordered under concurrency

use autoapply::models::{JobItem, LogCategory, RunState};
use autoapply::state::{LogSink, RunEvent, StatusBoard};
use std::sync::Arc;
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn test_state_change_events_emitted() {
    let board = Arc::new(StatusBoard::new());
    let mut rx = board.subscribe();

    board.set_state(RunState::Running);

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert_eq!(
        event,
        RunEvent::StateChanged {
            from: RunState::Idle,
            to: RunState::Running
        }
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let board = Arc::new(StatusBoard::new());
    let mut rx1 = board.subscribe();
    let mut rx2 = board.subscribe();
    let mut rx3 = board.subscribe();

    board.set_total(5);

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout")
            .expect("Channel closed");
        assert!(matches!(event, RunEvent::ProgressUpdated { total: 5, .. }));
    }
}

#[tokio::test]
async fn test_current_job_events_carry_identity() {
    let board = Arc::new(StatusBoard::new());
    let mut rx = board.subscribe();

    let job = JobItem::new(2, "Data Engineer at Company 2", "https://example.com/2");
    board.set_current_job(&job);

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    assert_eq!(
        event,
        RunEvent::CurrentJobChanged {
            job_id: Some(2),
            job_title: Some("Data Engineer at Company 2".to_string()),
        }
    );
}

#[tokio::test]
async fn test_snapshots_are_never_torn() {
    let board = Arc::new(StatusBoard::new());
    board.set_total(10_000);

    // The writer always increments both counters inside one update; readers
    // must never observe one incremented without the other
    let writer = {
        let board = board.clone();
        tokio::spawn(async move {
            for _ in 0..2_000 {
                board.update(|status| {
                    status.jobs_completed += 1;
                    status.jobs_failed += 1;
                });
                tokio::task::yield_now().await;
            }
        })
    };

    let reader = {
        let board = board.clone();
        tokio::spawn(async move {
            for _ in 0..2_000 {
                let status = board.snapshot();
                assert_eq!(
                    status.jobs_completed, status.jobs_failed,
                    "torn snapshot: {status:?}"
                );
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_counter_updates_are_all_applied() {
    let board = Arc::new(StatusBoard::new());
    board.set_total(400);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let board = board.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        board.record_completed();
                    } else {
                        board.record_failed();
                    }
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let status = board.snapshot();
    assert_eq!(status.jobs_completed, 200);
    assert_eq!(status.jobs_failed, 200);
    assert_eq!(status.jobs_processed(), status.jobs_total);
}

#[tokio::test]
async fn test_log_sink_orders_concurrent_appends() {
    let log = LogSink::new();

    let tasks: Vec<_> = (0..4)
        .map(|worker| {
            let log = log.clone();
            tokio::spawn(async move {
                for i in 0..25 {
                    log.append(LogCategory::Info, format!("worker {worker} entry {i}"));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let entries = log.snapshot();
    assert_eq!(entries.len(), 100);

    // Ids match append order as stored, strictly increasing by one
    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry.id, index as u64 + 1);
    }
}

#[tokio::test]
async fn test_log_reset_between_runs() {
    let log = LogSink::new();
    log.append(LogCategory::Info, "first run entry");
    log.append(LogCategory::Success, "first run entry");

    log.reset();
    let entry = log.append(LogCategory::Info, "second run entry");

    assert_eq!(entry.id, 1);
    assert_eq!(log.snapshot().len(), 1);
}
