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

// src/capture/device.rs
// Capture device abstraction.
//
// A CaptureBackend opens devices by index; a CaptureDevice is one opened
// device, owned by a single attempt and released at the end of it. All
// methods are blocking and are only called from the blocking thread pool.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use super::request::Resolution;
use crate::errors::CaptureError;

// Frame is one encoded still image as returned by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Bytes,
}

impl Frame {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub trait CaptureDevice: Send {
    // configure requests a frame geometry. Only called when the
    // request carries a resolution.
    fn configure(&mut self, resolution: Resolution) -> Result<(), CaptureError>;

    // read_frame grabs the next frame.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    // skip_frames discards count frames to let exposure settle.
    // Read errors while skipping are not interesting.
    fn skip_frames(&mut self, count: u32) {
        for skipped in 0..count {
            if let Err(e) = self.read_frame() {
                debug!(skipped, error = %e, "Ignoring error while skipping frames");
            }
        }
    }

    // release gives the device back. Called exactly once per opened
    // device, whatever the outcome of the attempt.
    fn release(&mut self) {}
}

pub trait CaptureBackend: Send + Sync + 'static {
    // open opens the capture device with the given index
    // (0 for /dev/video0 and so on).
    fn open(&self, index: u32) -> Result<Box<dyn CaptureDevice>, CaptureError>;
}

// write_frame stores a frame at path and flushes it to disk before
// returning, so the size check that follows sees the final file.
pub fn write_frame(path: &Path, frame: &Frame) -> Result<(), CaptureError> {
    let mut file = File::create(path)?;
    file.write_all(&frame.data)?;
    file.sync_all()?;
    Ok(())
}
