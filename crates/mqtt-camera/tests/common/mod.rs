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

// tests/common/mod.rs
// Fakes shared by the integration tests: a bus transport that records
// requests, scripted camera backends and recording message handlers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mqtt_camera::capture::{CaptureBackend, CaptureDevice, Frame, Resolution};
use mqtt_camera::errors::{CaptureError, MqttCameraError};
use mqtt_camera::router::{InboundMessage, MessageHandler};
use mqtt_camera::{BusTransport, PublishOptions};

// A tiny but valid JPEG: SOI followed by EOI.
pub const JPEG_FRAME: &[u8] = &[0xff, 0xd8, 0xff, 0xd9];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    Subscribe(String),
    Unsubscribe(String),
    Publish(String, Vec<u8>),
}

// RecordingTransport records every request; with reject set it fails
// them the way a closed client queue would.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<BusCall>>,
    reject: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<BusCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    fn record(&self, call: BusCall) -> Result<(), MqttCameraError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(MqttCameraError::ConnectionError(
                rumqttc::ClientError::Request(rumqttc::Request::Disconnect(rumqttc::Disconnect)),
            ));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl BusTransport for RecordingTransport {
    fn subscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        self.record(BusCall::Subscribe(topic.to_string()))
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        self.record(BusCall::Unsubscribe(topic.to_string()))
    }

    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        _options: PublishOptions,
    ) -> Result<(), MqttCameraError> {
        self.record(BusCall::Publish(topic.to_string(), payload))
    }
}

// RecordingHandler remembers the topics it was invoked for and can be
// told to fail every call.
pub struct RecordingHandler {
    name: &'static str,
    fail: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    // new returns a handler that appends "<name>:<topic>" to log.
    pub fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: false,
            log,
        })
    }

    pub fn failing(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: true,
            log,
        })
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: &InboundMessage) -> Result<(), MqttCameraError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, message.topic));
        if self.fail {
            return Err(MqttCameraError::handler_failed(self.name));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    // The device cannot be opened at all.
    Unavailable,
    // The device opens but hands back empty frames.
    EmptyFrames,
}

// CameraState is shared between a FakeCamera and the devices it opens,
// so tests can inspect what happened after the fact.
pub struct CameraState {
    failure: FailureMode,
    failures_left: AtomicU32,
    pub opens: AtomicU32,
    pub releases: AtomicU32,
    pub reads: AtomicU32,
    pub configured: Mutex<Vec<Resolution>>,
}

impl CameraState {
    fn consume_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> u32 {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn configured(&self) -> Vec<Resolution> {
        self.configured.lock().unwrap().clone()
    }
}

// FakeCamera fails the first `failures` attempts, then produces
// JPEG_FRAME on every read.
pub struct FakeCamera {
    pub state: Arc<CameraState>,
}

impl FakeCamera {
    pub fn failing_first(failures: u32, failure: FailureMode) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(CameraState {
                failure,
                failures_left: AtomicU32::new(failures),
                opens: AtomicU32::new(0),
                releases: AtomicU32::new(0),
                reads: AtomicU32::new(0),
                configured: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn working() -> Arc<Self> {
        Self::failing_first(0, FailureMode::Unavailable)
    }

    pub fn broken(failure: FailureMode) -> Arc<Self> {
        Self::failing_first(u32::MAX, failure)
    }
}

impl CaptureBackend for FakeCamera {
    fn open(&self, index: u32) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        self.state.opens.fetch_add(1, Ordering::SeqCst);
        let fail = self.state.consume_failure();
        if fail && self.state.failure == FailureMode::Unavailable {
            return Err(CaptureError::device_unavailable(index, "no such device"));
        }
        Ok(Box::new(FakeDevice {
            state: self.state.clone(),
            empty_frames: fail,
        }))
    }
}

struct FakeDevice {
    state: Arc<CameraState>,
    empty_frames: bool,
}

impl CaptureDevice for FakeDevice {
    fn configure(&mut self, resolution: Resolution) -> Result<(), CaptureError> {
        self.state.configured.lock().unwrap().push(resolution);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.state.reads.fetch_add(1, Ordering::SeqCst);
        if self.empty_frames {
            return Ok(Frame::new(Vec::new()));
        }
        Ok(Frame::new(JPEG_FRAME))
    }

    fn release(&mut self) {
        self.state.releases.fetch_add(1, Ordering::SeqCst);
    }
}

// files_in lists the file names in dir, sorted.
pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
