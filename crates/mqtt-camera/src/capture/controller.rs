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

// src/capture/controller.rs
// CaptureController runs a capture with bounded retries.
//
// An attempt succeeds when the frame was written and flushed and the
// target file then has a non-zero size. Device errors are logged and retried
// like any other failed attempt, and exhaustion is reported through the
// returned CaptureOutcome rather than as an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use super::device::{CaptureBackend, CaptureDevice, write_frame};
use super::request::{CaptureOutcome, CaptureRequest};
use crate::errors::CaptureError;

// DEFAULT_MAX_ATTEMPTS is the total number of device attempts per
// capture, first try included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

// DEFAULT_BACKOFF is the pause between two failed attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    // new creates a policy; at least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF)
    }
}

pub struct CaptureController {
    backend: Arc<dyn CaptureBackend>,
    policy: RetryPolicy,
}

impl CaptureController {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    // capture takes a still image named after the current local time.
    pub async fn capture(&self, request: &CaptureRequest) -> CaptureOutcome {
        let path = request.output_path_at(Local::now());
        self.capture_to(request, path).await
    }

    // capture_to takes a still image into path, retrying per the
    // policy until the file is non-empty or the budget is used up.
    pub async fn capture_to(&self, request: &CaptureRequest, path: PathBuf) -> CaptureOutcome {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            // A file left at path by an earlier capture in the same
            // second does not count; only a written frame does.
            let written = match self.attempt(request, &path).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        attempt,
                        device = request.device_index(),
                        error = %e,
                        "Capture attempt failed"
                    );
                    false
                }
            };

            let size_bytes = if written { file_size(&path).await } else { 0 };
            if size_bytes > 0 {
                info!(
                    path = %path.display(),
                    size_bytes,
                    attempt,
                    "Captured image"
                );
                return CaptureOutcome {
                    success: true,
                    file_path: path,
                    size_bytes,
                    attempts: attempt,
                };
            }

            warn!(
                attempt,
                max_attempts,
                path = %path.display(),
                "Camera capture produced no image"
            );
            if attempt < max_attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        remove_empty_leftover(&path).await;
        CaptureOutcome {
            success: false,
            file_path: path,
            size_bytes: 0,
            attempts: max_attempts,
        }
    }

    // attempt runs one open/configure/read/write/release cycle on the
    // blocking thread pool.
    async fn attempt(&self, request: &CaptureRequest, path: &Path) -> Result<(), CaptureError> {
        let backend = self.backend.clone();
        let request = request.clone();
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || run_attempt(backend.as_ref(), &request, &path))
            .await
            .map_err(|e| CaptureError::WorkerFailed(e.to_string()))?
    }
}

// run_attempt opens the device, drives it and always releases it
// once it was opened.
fn run_attempt(
    backend: &dyn CaptureBackend,
    request: &CaptureRequest,
    path: &Path,
) -> Result<(), CaptureError> {
    let mut device = backend.open(request.device_index())?;
    let result = drive_device(device.as_mut(), request, path);
    device.release();
    result
}

fn drive_device(
    device: &mut dyn CaptureDevice,
    request: &CaptureRequest,
    path: &Path,
) -> Result<(), CaptureError> {
    if let Some(resolution) = request.resolution() {
        device.configure(resolution)?;
    }
    device.skip_frames(request.frames_to_skip());

    let frame = device.read_frame()?;
    if frame.is_empty() {
        return Err(CaptureError::EmptyFrame);
    }
    write_frame(path, &frame)
}

async fn file_size(path: &Path) -> u64 {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.len())
        .unwrap_or(0)
}

// remove_empty_leftover deletes a zero-size file left behind by
// the failed attempts. A non-empty file is never touched.
async fn remove_empty_leftover(path: &Path) {
    if let Ok(metadata) = tokio::fs::metadata(path).await
        && metadata.is_file()
        && metadata.len() == 0
    {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "Removed empty capture file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Could not remove empty capture file"),
        }
    }
}
