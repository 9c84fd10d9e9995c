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

// src/stats.rs
// Diagnostic counters for message dispatch and capture triggers.
//
// Trackers hold lock-free atomic counters that are safe to bump from
// any task; to_stats takes an immutable snapshot for logging or for
// callers that want to inspect what happened.

use std::sync::atomic::{AtomicUsize, Ordering};

// DispatchStats is a snapshot of router and event loop activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    // total_dispatched is the number of inbound messages handed
    // to the router.
    pub total_dispatched: usize,
    // total_unmatched is the number of inbound messages that
    // matched no subscription.
    pub total_unmatched: usize,
    // total_handler_invocations counts every handler call, so one
    // message matching three subscriptions counts three times.
    pub total_handler_invocations: usize,
    // total_handler_failures counts handler calls that returned
    // an error.
    pub total_handler_failures: usize,
    // total_event_loop_errors is the number of connection errors
    // reported by the bus event loop.
    pub total_event_loop_errors: usize,
}

// DispatchStatsTracker is the live counterpart of DispatchStats.
#[derive(Debug, Default)]
pub struct DispatchStatsTracker {
    dispatched: AtomicUsize,
    unmatched: AtomicUsize,
    handler_invocations: AtomicUsize,
    handler_failures: AtomicUsize,
    event_loop_errors: AtomicUsize,
}

impl DispatchStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unmatched(&self) {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_handler_invocations(&self) {
        self.handler_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_handler_failures(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_event_loop_errors(&self) {
        self.event_loop_errors.fetch_add(1, Ordering::Relaxed);
    }

    // to_stats takes a snapshot of the current counter values.
    pub fn to_stats(&self) -> DispatchStats {
        DispatchStats {
            total_dispatched: self.dispatched.load(Ordering::Relaxed),
            total_unmatched: self.unmatched.load(Ordering::Relaxed),
            total_handler_invocations: self.handler_invocations.load(Ordering::Relaxed),
            total_handler_failures: self.handler_failures.load(Ordering::Relaxed),
            total_event_loop_errors: self.event_loop_errors.load(Ordering::Relaxed),
        }
    }
}

// TriggerStats is a snapshot of capture trigger activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerStats {
    // total_triggers is the number of messages that started a capture.
    pub total_triggers: usize,
    // total_captured is the number of triggers that produced a
    // non-empty image file.
    pub total_captured: usize,
    // total_exhausted is the number of triggers that used up the
    // retry budget without an image.
    pub total_exhausted: usize,
    // total_attempts is the number of device attempts across
    // all triggers.
    pub total_attempts: usize,
    // total_post_processed is the number of post-process commands
    // that ran and exited successfully.
    pub total_post_processed: usize,
    // total_post_process_failures is the number of post-process
    // commands that failed to spawn or exited non-zero.
    pub total_post_process_failures: usize,
}

// TriggerStatsTracker is the live counterpart of TriggerStats.
#[derive(Debug, Default)]
pub struct TriggerStatsTracker {
    triggers: AtomicUsize,
    captured: AtomicUsize,
    exhausted: AtomicUsize,
    attempts: AtomicUsize,
    post_processed: AtomicUsize,
    post_process_failures: AtomicUsize,
}

impl TriggerStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // increment_triggers records a new trigger and returns its
    // 1-based sequence number, used to correlate log lines.
    pub fn increment_triggers(&self) -> usize {
        self.triggers.fetch_add(1, Ordering::Relaxed) + 1
    }

    // record_outcome records the end of a capture, successful or not,
    // along with how many device attempts it took.
    pub fn record_outcome(&self, success: bool, attempts: u32) {
        if success {
            self.captured.fetch_add(1, Ordering::Relaxed);
        } else {
            self.exhausted.fetch_add(1, Ordering::Relaxed);
        }
        self.attempts.fetch_add(attempts as usize, Ordering::Relaxed);
    }

    pub fn record_post_process(&self, success: bool) {
        if success {
            self.post_processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.post_process_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn to_stats(&self) -> TriggerStats {
        TriggerStats {
            total_triggers: self.triggers.load(Ordering::Relaxed),
            total_captured: self.captured.load(Ordering::Relaxed),
            total_exhausted: self.exhausted.load(Ordering::Relaxed),
            total_attempts: self.attempts.load(Ordering::Relaxed),
            total_post_processed: self.post_processed.load(Ordering::Relaxed),
            total_post_process_failures: self.post_process_failures.load(Ordering::Relaxed),
        }
    }
}
