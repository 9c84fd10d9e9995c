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

// src/capture/v4l_backend.rs
// Video4Linux capture backend.
//
// Devices are asked for MJPG so every frame is already an encoded JPEG
// and can be written out as-is. A capture stream is only set up for the
// duration of one read, with any requested warm-up frames discarded on
// that same stream. Frames are never re-encoded, so a camera that only
// offers raw formats (YUYV and the like) cannot be used.

use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use tracing::debug;

use super::device::{CaptureBackend, CaptureDevice, Frame};
use super::request::Resolution;
use crate::errors::CaptureError;

// STREAM_BUFFERS is the number of mmap buffers requested per stream.
const STREAM_BUFFERS: u32 = 4;

const MJPG: &[u8; 4] = b"MJPG";

// V4lBackend opens /dev/videoN devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct V4lBackend;

impl V4lBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBackend for V4lBackend {
    fn open(&self, index: u32) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        let device = Device::new(index as usize)
            .map_err(|e| CaptureError::device_unavailable(index, e))?;

        let mut format = device
            .format()
            .map_err(|e| CaptureError::device_unavailable(index, e))?;
        format.fourcc = FourCC::new(MJPG);
        let format = device
            .set_format(&format)
            .map_err(|e| CaptureError::ConfigureFailed(e.to_string()))?;
        if format.fourcc != FourCC::new(MJPG) {
            return Err(unsupported_format(index, format.fourcc));
        }
        debug!(index, width = format.width, height = format.height, "Opened capture device");

        Ok(Box::new(V4lCamera {
            index,
            device: Some(device),
            pending_skip: 0,
        }))
    }
}

// unsupported_format is the error for a device that would not switch
// to MJPG output.
fn unsupported_format(index: u32, offered: impl std::fmt::Display) -> CaptureError {
    CaptureError::ConfigureFailed(format!(
        "device {index} does not support MJPG output (offered {offered}); \
         only cameras that deliver MJPG frames can be used"
    ))
}

pub struct V4lCamera {
    index: u32,
    device: Option<Device>,
    // pending_skip is the number of frames to discard at the start
    // of the next read.
    pending_skip: u32,
}

impl V4lCamera {
    fn device(&self) -> Result<&Device, CaptureError> {
        self.device
            .as_ref()
            .ok_or_else(|| CaptureError::device_unavailable(self.index, "device already released"))
    }
}

impl CaptureDevice for V4lCamera {
    fn configure(&mut self, resolution: Resolution) -> Result<(), CaptureError> {
        let device = self.device()?;
        let mut format = device
            .format()
            .map_err(|e| CaptureError::ConfigureFailed(e.to_string()))?;
        format.width = resolution.width;
        format.height = resolution.height;
        format.fourcc = FourCC::new(MJPG);

        let applied = device
            .set_format(&format)
            .map_err(|e| CaptureError::ConfigureFailed(e.to_string()))?;
        if applied.width != resolution.width || applied.height != resolution.height {
            debug!(
                requested = %resolution,
                width = applied.width,
                height = applied.height,
                "Device adjusted requested resolution"
            );
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let skip = std::mem::take(&mut self.pending_skip);
        let device = self.device()?;
        let mut stream = Stream::with_buffers(device, Type::VideoCapture, STREAM_BUFFERS)
            .map_err(|e| CaptureError::FrameReadFailed(e.to_string()))?;

        for skipped in 0..skip {
            if let Err(e) = stream.next() {
                debug!(skipped, error = %e, "Ignoring error while skipping frames");
            }
        }

        let (buffer, meta) = stream
            .next()
            .map_err(|e| CaptureError::FrameReadFailed(e.to_string()))?;
        let used = (meta.bytesused as usize).min(buffer.len());
        if used == 0 {
            return Err(CaptureError::EmptyFrame);
        }
        Ok(Frame::new(buffer[..used].to_vec()))
    }

    // Frames are discarded on the stream the next read sets up.
    fn skip_frames(&mut self, count: u32) {
        self.pending_skip = count;
    }

    fn release(&mut self) {
        if self.device.take().is_some() {
            debug!(index = self.index, "Released capture device");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_the_requirement() {
        let err = unsupported_format(0, FourCC::new(b"YUYV"));
        assert!(err.is_device_error());
        let message = err.to_string();
        assert!(message.contains("YUYV"));
        assert!(message.contains("only cameras that deliver MJPG frames"));
    }
}
