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

// src/bus/transport.rs
// Outbound requests to the message bus. The router only talks to the
// bus through BusTransport. Requests are fire-and-forget: they are queued
// on the client and the broker's acknowledgement is not awaited.

use std::sync::Arc;

use rumqttc::{AsyncClient, QoS};

use crate::errors::MqttCameraError;

// DEFAULT_QOS is used for subscriptions and for publishes without an override.
pub const DEFAULT_QOS: QoS = QoS::AtMostOnce;

// PublishOptions carries per-publish overrides for QoS and retain.
#[derive(Clone, Copy, Debug, Default)]
pub struct PublishOptions {
    pub qos: Option<QoS>,
    pub retain: Option<bool>,
}

impl PublishOptions {
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = Some(qos);
        self
    }

    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = Some(retain);
        self
    }

    // effective_qos falls back to DEFAULT_QOS.
    pub fn effective_qos(&self) -> QoS {
        self.qos.unwrap_or(DEFAULT_QOS)
    }

    pub fn effective_retain(&self) -> bool {
        self.retain.unwrap_or(false)
    }
}

// BusTransport is the request side of the bus; tests swap in a recorder.
pub trait BusTransport: Send + Sync + 'static {
    fn subscribe(&self, topic: &str) -> Result<(), MqttCameraError>;

    fn unsubscribe(&self, topic: &str) -> Result<(), MqttCameraError>;

    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        options: PublishOptions,
    ) -> Result<(), MqttCameraError>;
}

// The try_* variants queue the request without waiting for room in the
// client channel, so a stalled event loop surfaces as an error here
// instead of blocking the caller.
impl BusTransport for AsyncClient {
    fn subscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        self.try_subscribe(topic, DEFAULT_QOS)?;
        Ok(())
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        self.try_unsubscribe(topic)?;
        Ok(())
    }

    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        options: PublishOptions,
    ) -> Result<(), MqttCameraError> {
        self.try_publish(
            topic,
            options.effective_qos(),
            options.effective_retain(),
            payload,
        )?;
        Ok(())
    }
}

impl<T: BusTransport> BusTransport for Arc<T> {
    fn subscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        T::subscribe(self, topic)
    }

    fn unsubscribe(&self, topic: &str) -> Result<(), MqttCameraError> {
        T::unsubscribe(self, topic)
    }

    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        options: PublishOptions,
    ) -> Result<(), MqttCameraError> {
        T::publish(self, topic, payload, options)
    }
}
