/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// tests/trigger.rs
// Tests for CameraTrigger: capture followed by the post-process hook,
// exhaustion handling, detached hooks and state reporting.

mod common;

use std::time::Duration;

use bytes::Bytes;
use common::{FailureMode, FakeCamera, files_in};
use mqtt_camera::capture::{CaptureController, CaptureRequest};
use mqtt_camera::hook::PostProcessHook;
use mqtt_camera::router::{InboundMessage, MessageHandler};
use mqtt_camera::trigger::{CameraTrigger, TriggerState};

// marker_hook appends every captured path to marker, one per line.
fn marker_hook(marker: &std::path::Path) -> PostProcessHook {
    PostProcessHook::new(Some(format!("echo >> {}", marker.display())))
}

#[tokio::test]
async fn test_successful_capture_runs_hook_inline() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("captures");
    std::fs::create_dir(&output).unwrap();
    let marker = dir.path().join("marker.txt");

    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::working()),
        CaptureRequest::new(0, &output),
        marker_hook(&marker),
    );

    let outcome = trigger.trigger("camera/snap").await;

    assert!(outcome.success);
    assert_eq!(
        std::fs::read_to_string(&marker).unwrap(),
        format!("{}\n", outcome.file_path.display())
    );
    assert_eq!(trigger.state(), TriggerState::Idle);

    let stats = trigger.stats();
    assert_eq!(stats.total_triggers, 1);
    assert_eq!(stats.total_captured, 1);
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.total_post_processed, 1);
    assert_eq!(stats.total_post_process_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_skips_hook() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("captures");
    std::fs::create_dir(&output).unwrap();
    let marker = dir.path().join("marker.txt");

    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::broken(FailureMode::Unavailable)),
        CaptureRequest::new(0, &output),
        marker_hook(&marker),
    );

    let outcome = trigger.trigger("camera/snap").await;

    assert!(!outcome.success);
    assert!(!marker.exists());
    assert!(files_in(&output).is_empty());
    assert_eq!(trigger.state(), TriggerState::Idle);

    let stats = trigger.stats();
    assert_eq!(stats.total_exhausted, 1);
    assert_eq!(stats.total_attempts, 3);
    assert_eq!(stats.total_post_processed, 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_is_not_a_handler_error() {
    let dir = tempfile::tempdir().unwrap();
    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::broken(FailureMode::EmptyFrames)),
        CaptureRequest::new(0, dir.path()),
        PostProcessHook::disabled(),
    );

    let message = InboundMessage::new("camera/snap", Bytes::new());
    trigger.handle(&message).await.unwrap();
    assert_eq!(trigger.stats().total_exhausted, 1);
}

#[tokio::test]
async fn test_failing_hook_is_counted_not_escalated() {
    let dir = tempfile::tempdir().unwrap();
    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::working()),
        CaptureRequest::new(0, dir.path()),
        PostProcessHook::new(Some("exit 1;".to_string())),
    );

    let message = InboundMessage::new("camera/snap", Bytes::new());
    trigger.handle(&message).await.unwrap();

    let stats = trigger.stats();
    assert_eq!(stats.total_captured, 1);
    assert_eq!(stats.total_post_processed, 0);
    assert_eq!(stats.total_post_process_failures, 1);
}

#[tokio::test]
async fn test_detached_hook_finishes_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("captures");
    std::fs::create_dir(&output).unwrap();
    let marker = dir.path().join("marker.txt");

    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::working()),
        CaptureRequest::new(0, &output),
        marker_hook(&marker),
    )
    .with_detached_exec(true);

    let outcome = trigger.trigger("camera/snap").await;
    assert!(outcome.success);
    assert_eq!(trigger.state(), TriggerState::Idle);

    tokio::time::timeout(Duration::from_secs(10), async {
        while trigger.stats().total_post_processed == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("detached hook did not finish");
    assert!(marker.exists());
}

#[tokio::test]
async fn test_state_changes_are_observable() {
    let dir = tempfile::tempdir().unwrap();
    let trigger = CameraTrigger::new(
        CaptureController::new(FakeCamera::working()),
        CaptureRequest::new(0, dir.path()),
        PostProcessHook::disabled(),
    );
    let mut state = trigger.subscribe_state();
    assert_eq!(*state.borrow_and_update(), TriggerState::Idle);

    trigger.trigger("camera/snap").await;

    assert!(state.has_changed().unwrap());
    assert_eq!(*state.borrow_and_update(), TriggerState::Idle);
}

#[tokio::test]
async fn test_state_walks_through_capture() {
    let dir = tempfile::tempdir().unwrap();
    let trigger = std::sync::Arc::new(CameraTrigger::new(
        CaptureController::new(FakeCamera::working()),
        CaptureRequest::new(0, dir.path()),
        PostProcessHook::new(Some("true".to_string())),
    ));
    let mut state = trigger.subscribe_state();

    let running = tokio::spawn({
        let trigger = trigger.clone();
        async move { trigger.trigger("camera/snap").await }
    });

    // The first change is the start of the capture; later states may
    // be coalesced by the watch channel.
    state.changed().await.unwrap();
    let first = *state.borrow_and_update();
    assert_ne!(first, TriggerState::Exhausted);

    assert!(running.await.unwrap().success);
    assert_eq!(trigger.state(), TriggerState::Idle);
}
