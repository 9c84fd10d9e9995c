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

// src/capture/mod.rs
// Camera capture: device traits, the retrying controller and, with the
// v4l2 feature, the Video4Linux backend.

mod controller;
mod device;
mod request;
#[cfg(feature = "v4l2")]
mod v4l_backend;

pub use controller::{CaptureController, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, RetryPolicy};
pub use device::{CaptureBackend, CaptureDevice, Frame, write_frame};
pub use request::{
    CaptureOutcome, CaptureRequest, DEFAULT_EXTENSION, FILE_TIMESTAMP_FORMAT, Resolution,
};
#[cfg(feature = "v4l2")]
pub use v4l_backend::{V4lBackend, V4lCamera};
