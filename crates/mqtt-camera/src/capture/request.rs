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

// src/capture/request.rs
// What to capture (CaptureRequest), at which geometry (Resolution), and
// what came out of it (CaptureOutcome).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::errors::CaptureError;

// DEFAULT_EXTENSION is the file extension for captured frames.
pub const DEFAULT_EXTENSION: &str = "jpg";

// FILE_TIMESTAMP_FORMAT names capture files by local wall-clock time,
// so captures less than a second apart share a name.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

// Resolution is a requested frame geometry. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidResolution(format!(
                "{width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    // parse_optional treats a missing or blank value as "no geometry
    // requested" and parses anything else as WIDTHxHEIGHT.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, CaptureError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl FromStr for Resolution {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CaptureError::InvalidResolution(s.to_string());
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(width, height).map_err(|_| invalid())
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// CaptureRequest is built once from configuration and reused for
// every trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    device_index: u32,
    resolution: Option<Resolution>,
    frames_to_skip: u32,
    output_dir: PathBuf,
    extension: String,
}

impl CaptureRequest {
    pub fn new(device_index: u32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            device_index,
            resolution: None,
            frames_to_skip: 0,
            output_dir: output_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_resolution(mut self, resolution: Option<Resolution>) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_frames_to_skip(mut self, frames: u32) -> Self {
        self.frames_to_skip = frames;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn device_index(&self) -> u32 {
        self.device_index
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn frames_to_skip(&self) -> u32 {
        self.frames_to_skip
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    // file_name_at names the capture taken at the given time.
    pub fn file_name_at(&self, now: DateTime<Local>) -> String {
        format!("{}.{}", now.format(FILE_TIMESTAMP_FORMAT), self.extension)
    }

    // output_path_at is the full path for a capture taken at the
    // given time.
    pub fn output_path_at(&self, now: DateTime<Local>) -> PathBuf {
        self.output_dir.join(self.file_name_at(now))
    }
}

// CaptureOutcome reports one capture, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    // success is true iff file_path exists with a non-zero size.
    pub success: bool,
    pub file_path: PathBuf,
    pub size_bytes: u64,
    // attempts is the number of device attempts made, 1-based.
    pub attempts: u32,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_resolution() {
        let resolution: Resolution = "1920x1080".parse().unwrap();
        assert_eq!(resolution, Resolution::new(1920, 1080).unwrap());
        assert_eq!(resolution.to_string(), "1920x1080");
    }

    #[test]
    fn test_parse_resolution_rejects_garbage() {
        for value in ["1920", "1920x", "x1080", "0x1080", "640x0", "-1x10", "axb", "1x2x3"] {
            assert!(
                matches!(
                    value.parse::<Resolution>(),
                    Err(CaptureError::InvalidResolution(_))
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_optional_resolution() {
        assert_eq!(Resolution::parse_optional(None).unwrap(), None);
        assert_eq!(Resolution::parse_optional(Some("")).unwrap(), None);
        assert_eq!(Resolution::parse_optional(Some("  ")).unwrap(), None);
        assert_eq!(
            Resolution::parse_optional(Some("640x480")).unwrap(),
            Some(Resolution::new(640, 480).unwrap())
        );
        assert!(Resolution::parse_optional(Some("640")).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = CaptureRequest::new(0, ".");
        assert_eq!(request.device_index(), 0);
        assert_eq!(request.resolution(), None);
        assert_eq!(request.frames_to_skip(), 0);
        assert_eq!(request.extension(), "jpg");
    }

    #[test]
    fn test_output_path_uses_local_timestamp() {
        let request = CaptureRequest::new(2, "/var/captures");
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            request.output_path_at(now),
            PathBuf::from("/var/captures/20240307-090501.jpg")
        );
    }

    #[test]
    fn test_names_differ_a_second_apart() {
        let request = CaptureRequest::new(0, ".");
        let first = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let second = first + chrono::Duration::seconds(1);
        assert_ne!(request.file_name_at(first), request.file_name_at(second));
        assert_eq!(request.file_name_at(second), "20250101-000000.jpg");
    }
}
