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

// src/lib.rs
// Main exports for the mqtt-camera library: topic routing, the MQTT
// bus, camera capture with retries and the post-process hook.

pub mod app;
pub mod bus;
pub mod capture;
pub mod cli;
pub mod config;
pub mod errors;
pub mod hook;
pub mod router;
pub mod stats;
pub mod trigger;

// Export some things for convenience.
pub use app::{App, TRIGGER_KEY};
pub use bus::{BusOptions, BusTransport, MqttBus, PublishOptions};
pub use capture::{
    CaptureBackend, CaptureController, CaptureDevice, CaptureOutcome, CaptureRequest, Resolution,
    RetryPolicy,
};
pub use config::{Config, ConfigError, Settings};
pub use errors::{CaptureError, MqttCameraError};
pub use hook::{PostProcessHook, PostProcessOutput};
pub use router::{InboundMessage, MessageHandler, Subscription, TopicRouter};
pub use rumqttc::QoS;
pub use stats::{DispatchStats, TriggerStats};
pub use trigger::{CameraTrigger, TriggerState};
