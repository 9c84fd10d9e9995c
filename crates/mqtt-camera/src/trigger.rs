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

// src/trigger.rs
// CameraTrigger is the message handler that turns an inbound message
// into a capture followed by the optional post-process hook.
//
// State machine, one pass per message:
//   Idle -> Capturing -> Success -> [PostProcessing ->] Idle
//                     -> Exhausted -> Idle
// The current state is published on a watch channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::capture::{CaptureController, CaptureOutcome, CaptureRequest};
use crate::errors::MqttCameraError;
use crate::hook::PostProcessHook;
use crate::router::{InboundMessage, MessageHandler};
use crate::stats::{TriggerStats, TriggerStatsTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Capturing,
    Success,
    PostProcessing,
    Exhausted,
}

impl std::fmt::Display for TriggerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Success => "success",
            Self::PostProcessing => "post-processing",
            Self::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

pub struct CameraTrigger {
    controller: CaptureController,
    request: CaptureRequest,
    hook: PostProcessHook,
    // detach_exec runs the hook on a spawned task instead of
    // waiting for it before returning to dispatch.
    detach_exec: bool,
    stats: Arc<TriggerStatsTracker>,
    state: watch::Sender<TriggerState>,
}

impl CameraTrigger {
    pub fn new(controller: CaptureController, request: CaptureRequest, hook: PostProcessHook) -> Self {
        let (state, _) = watch::channel(TriggerState::Idle);
        Self {
            controller,
            request,
            hook,
            detach_exec: false,
            stats: Arc::new(TriggerStatsTracker::new()),
            state,
        }
    }

    pub fn with_detached_exec(mut self, detach: bool) -> Self {
        self.detach_exec = detach;
        self
    }

    pub fn request(&self) -> &CaptureRequest {
        &self.request
    }

    // subscribe_state returns a receiver that observes every
    // state change from now on.
    pub fn subscribe_state(&self) -> watch::Receiver<TriggerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> TriggerState {
        *self.state.borrow()
    }

    pub fn stats(&self) -> TriggerStats {
        self.stats.to_stats()
    }

    fn set_state(&self, state: TriggerState) {
        self.state.send_replace(state);
    }

    // trigger runs one full capture pass for a message received on
    // topic and returns the capture outcome.
    pub async fn trigger(&self, topic: &str) -> CaptureOutcome {
        let sequence = self.stats.increment_triggers();
        info!(trigger = sequence, topic = %topic, "Capture triggered");

        self.set_state(TriggerState::Capturing);
        let outcome = self.controller.capture(&self.request).await;
        self.stats.record_outcome(outcome.success, outcome.attempts);

        if !outcome.success {
            self.set_state(TriggerState::Exhausted);
            warn!(
                trigger = sequence,
                attempts = outcome.attempts,
                path = %outcome.file_path.display(),
                "Camera capture failed, giving up on this trigger"
            );
            self.set_state(TriggerState::Idle);
            return outcome;
        }

        self.set_state(TriggerState::Success);
        if self.hook.is_configured() {
            self.set_state(TriggerState::PostProcessing);
            if self.detach_exec {
                let hook = self.hook.clone();
                let stats = self.stats.clone();
                let path = outcome.file_path.clone();
                tokio::spawn(async move {
                    run_hook(&hook, &stats, &path).await;
                });
            } else {
                run_hook(&self.hook, &self.stats, &outcome.file_path).await;
            }
        }
        self.set_state(TriggerState::Idle);
        outcome
    }
}

// run_hook runs the post-process command and records the result.
// Failures are logged only.
async fn run_hook(hook: &PostProcessHook, stats: &TriggerStatsTracker, path: &std::path::Path) {
    match hook.run(path).await {
        Ok(Some(output)) => stats.record_post_process(output.success()),
        Ok(None) => {}
        Err(e) => {
            stats.record_post_process(false);
            warn!(path = %path.display(), error = %e, "Post-process hook failed");
        }
    }
}

#[async_trait]
impl MessageHandler for CameraTrigger {
    // Capture exhaustion is not a handler failure; it was already
    // logged and the trigger is simply dropped.
    async fn handle(&self, message: &InboundMessage) -> Result<(), MqttCameraError> {
        self.trigger(&message.topic).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(TriggerState::Idle.to_string(), "idle");
        assert_eq!(TriggerState::PostProcessing.to_string(), "post-processing");
    }
}
