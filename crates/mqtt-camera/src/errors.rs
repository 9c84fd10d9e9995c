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

// src/errors.rs
// Error types for routing, bus requests and camera capture.
//
// MqttCameraError covers everything on the message side (bus requests,
// registry lookups, handlers). CaptureError covers the device side and
// never escapes the capture controller: failed attempts are retried and
// exhaustion is reported through CaptureOutcome instead.

use rumqttc::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MqttCameraError {
    #[error("MQTT client request failed: {0}")]
    ConnectionError(#[from] ClientError),

    #[error("No subscription registered under key: {0}")]
    UnknownSubscription(String),

    #[error("Invalid topic pattern: {0}")]
    InvalidTopicPattern(String),

    #[error("Message handler failed: {0}")]
    HandlerFailed(String),

    #[error("Post-process command failed: {0}")]
    PostProcessFailed(String),
}

impl MqttCameraError {
    // unknown_subscription creates an UnknownSubscription error
    // for the given registration key.
    pub fn unknown_subscription(key: &str) -> Self {
        Self::UnknownSubscription(key.to_string())
    }

    // invalid_topic_pattern creates an InvalidTopicPattern error.
    pub fn invalid_topic_pattern(msg: &str) -> Self {
        Self::InvalidTopicPattern(msg.to_string())
    }

    // handler_failed creates a HandlerFailed error, which is what
    // custom handlers are expected to return on failure.
    pub fn handler_failed(msg: &str) -> Self {
        Self::HandlerFailed(msg.to_string())
    }

    // post_process_failed creates a PostProcessFailed error.
    pub fn post_process_failed(msg: &str) -> Self {
        Self::PostProcessFailed(msg.to_string())
    }

    // is_connection_error checks if this error came from the
    // underlying MQTT client (request queue closed or full).
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }

    // is_registry_error checks if this error came from subscription
    // registration or lookup.
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSubscription(_) | Self::InvalidTopicPattern(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device {index} unavailable: {reason}")]
    DeviceUnavailable { index: u32, reason: String },

    #[error("Failed to configure capture device: {0}")]
    ConfigureFailed(String),

    #[error("Failed to read frame: {0}")]
    FrameReadFailed(String),

    #[error("Capture device returned an empty frame")]
    EmptyFrame,

    #[error("Invalid resolution '{0}', expected WIDTHxHEIGHT")]
    InvalidResolution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Capture worker failed: {0}")]
    WorkerFailed(String),
}

impl CaptureError {
    // device_unavailable creates a DeviceUnavailable error for the
    // device at the given index.
    pub fn device_unavailable(index: u32, reason: impl std::fmt::Display) -> Self {
        Self::DeviceUnavailable {
            index,
            reason: reason.to_string(),
        }
    }

    // is_device_error checks if this error was raised by the device
    // itself, as opposed to the filesystem or the worker pool.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnavailable { .. }
                | Self::ConfigureFailed(_)
                | Self::FrameReadFailed(_)
                | Self::EmptyFrame
        )
    }
}
