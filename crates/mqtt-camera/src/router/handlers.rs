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

// src/router/handlers.rs
// Message handler abstractions for routed MQTT messages.
//
// Anything bound to a subscription implements MessageHandler. The
// ClosureAdapter lets plain async closures be registered without
// writing a struct for them.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::Bytes;
use rumqttc::Publish;

use crate::errors::MqttCameraError;

// InboundMessage is a message delivered by the bus. The payload is
// carried along but never interpreted by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    // topic is the full topic the message was published on.
    pub topic: String,
    // payload is the raw message body (reference counted).
    pub payload: Bytes,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    // from_publish converts an MQTT publish packet, sharing the
    // payload buffer instead of copying it.
    pub fn from_publish(publish: &Publish) -> Self {
        Self {
            topic: publish.topic.clone(),
            payload: publish.payload.clone(),
        }
    }
}

// MessageHandler processes messages for the subscription(s) it is
// registered under. An Err is logged and counted by the router; it
// never stops delivery to other handlers.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &InboundMessage) -> Result<(), MqttCameraError>;
}

// ClosureAdapter wraps an async closure so it can be registered as a
// MessageHandler.
pub struct ClosureAdapter<F, Fut>
where
    F: Fn(InboundMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), MqttCameraError>> + Send + 'static,
{
    closure: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> ClosureAdapter<F, Fut>
where
    F: Fn(InboundMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), MqttCameraError>> + Send + 'static,
{
    pub fn new(closure: F) -> Self {
        Self {
            closure,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> MessageHandler for ClosureAdapter<F, Fut>
where
    F: Fn(InboundMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), MqttCameraError>> + Send + 'static,
{
    async fn handle(&self, message: &InboundMessage) -> Result<(), MqttCameraError> {
        (self.closure)(message.clone()).await
    }
}
