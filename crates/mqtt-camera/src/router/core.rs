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

// src/router/core.rs
// TopicRouter: owns the subscriber registry and dispatches inbound
// messages to every matching handler.
//
// The registry sits behind a tokio RwLock. Dispatch only holds the read
// lock long enough to collect matching handlers, so a handler is free to
// call back into the router (for example to toggle a subscription).

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::handlers::{InboundMessage, MessageHandler};
use super::registry::SubscriberRegistry;
use super::subscription::Subscription;
use crate::bus::BusTransport;
use crate::errors::MqttCameraError;
use crate::stats::{DispatchStats, DispatchStatsTracker};

pub struct TopicRouter {
    registry: RwLock<SubscriberRegistry>,
    transport: Arc<dyn BusTransport>,
    // warn_on_unmatched_topic logs unmatched topics at warn
    // instead of debug. Defaults to true.
    warn_on_unmatched_topic: bool,
    stats: DispatchStatsTracker,
}

impl TopicRouter {
    // new creates an empty router issuing bus requests through
    // the given transport.
    pub fn new(transport: Arc<dyn BusTransport>) -> Self {
        Self {
            registry: RwLock::new(SubscriberRegistry::new()),
            transport,
            warn_on_unmatched_topic: true,
            stats: DispatchStatsTracker::new(),
        }
    }

    pub fn with_unmatched_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_unmatched_topic = enabled;
        self
    }

    // transport returns the bus transport, for callers that want
    // to publish outbound messages.
    pub fn transport(&self) -> &Arc<dyn BusTransport> {
        &self.transport
    }

    // register binds a handler to a subscription under key. An
    // existing binding for key is replaced in place and has to be
    // enabled again with set_enabled.
    pub async fn register(
        &self,
        key: impl Into<String>,
        subscription: Subscription,
        handler: Arc<dyn MessageHandler>,
    ) {
        let key = key.into();
        let mut registry = self.registry.write().await;
        let pattern = subscription.to_string();
        if registry.insert(key.clone(), subscription, handler) {
            debug!(key = %key, pattern = %pattern, "Replaced subscription binding");
        } else {
            debug!(key = %key, pattern = %pattern, "Registered subscription binding");
        }
    }

    // set_enabled asks the bus to start (true) or stop (false)
    // delivering messages for the binding stored under key. The
    // request is queued, not acknowledged; the enabled flag is only
    // recorded once the request was accepted by the transport.
    pub async fn set_enabled(&self, key: &str, enabled: bool) -> Result<(), MqttCameraError> {
        let mut registry = self.registry.write().await;
        let entry = registry
            .get_mut(key)
            .ok_or_else(|| MqttCameraError::unknown_subscription(key))?;

        let pattern = entry.subscription.pattern();
        if enabled {
            self.transport.subscribe(pattern)?;
            info!(key = %key, topic = %pattern, "Subscribe requested");
        } else {
            self.transport.unsubscribe(pattern)?;
            info!(key = %key, topic = %pattern, "Unsubscribe requested");
        }
        entry.enabled = enabled;
        Ok(())
    }

    // is_enabled reports the recorded enabled flag for key, or None
    // if nothing is registered under it.
    pub async fn is_enabled(&self, key: &str) -> Option<bool> {
        self.registry.read().await.get(key).map(|e| e.enabled)
    }

    // unregister removes the binding for key, unsubscribing first
    // if it was enabled.
    pub async fn unregister(&self, key: &str) -> Result<(), MqttCameraError> {
        let mut registry = self.registry.write().await;
        let entry = registry
            .get(key)
            .ok_or_else(|| MqttCameraError::unknown_subscription(key))?;
        if entry.enabled {
            self.transport.unsubscribe(entry.subscription.pattern())?;
        }
        registry.remove(key);
        Ok(())
    }

    // dispatch hands the message to every matching handler, in
    // registration order. A failing handler is logged and counted and
    // the remaining handlers still run. Returns the number of handlers
    // invoked.
    pub async fn dispatch(&self, message: &InboundMessage) -> usize {
        self.stats.increment_dispatched();

        let handlers = self.registry.read().await.matching(message);
        if handlers.is_empty() {
            self.stats.increment_unmatched();
            if self.warn_on_unmatched_topic {
                warn!(topic = %message.topic, "No subscription matched topic");
            } else {
                debug!(topic = %message.topic, "No subscription matched topic");
            }
            return 0;
        }

        for (key, handler) in &handlers {
            self.stats.increment_handler_invocations();
            if let Err(e) = handler.handle(message).await {
                self.stats.increment_handler_failures();
                warn!(key = %key, topic = %message.topic, error = %e, "Message handler failed");
            }
        }
        handlers.len()
    }

    // resubscribe_enabled re-issues a subscribe request for every
    // enabled binding. Used after the bus reconnects without a
    // persistent session. Failures are logged; returns the number
    // of requests that were accepted.
    pub async fn resubscribe_enabled(&self) -> usize {
        let patterns = self.registry.read().await.enabled_patterns();
        let mut accepted = 0;
        for pattern in &patterns {
            match self.transport.subscribe(pattern) {
                Ok(()) => accepted += 1,
                Err(e) => warn!(topic = %pattern, error = %e, "Resubscribe failed"),
            }
        }
        if !patterns.is_empty() {
            info!(accepted, total = patterns.len(), "Resubscribed enabled topics");
        }
        accepted
    }

    // record_event_loop_error counts a connection error reported by
    // the bus event loop.
    pub fn record_event_loop_error(&self) {
        self.stats.increment_event_loop_errors();
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats.to_stats()
    }

    pub async fn len(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.read().await.is_empty()
    }
}
