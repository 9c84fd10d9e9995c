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

// src/bus/event_loop.rs
// MqttBus drives the rumqttc event loop and feeds inbound publishes
// to a TopicRouter.
//
// Each dispatch is awaited before the next event is polled, so messages
// are handled strictly one at a time. Connection errors are owned by
// rumqttc: polling again after an error reconnects, and the loop only
// logs, counts and waits in between.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, Packet};
use tracing::{debug, info, warn};

use super::options::BusOptions;
use crate::router::{InboundMessage, TopicRouter};

pub struct MqttBus {
    eventloop: EventLoop,
    reconnect_delay: Duration,
    // connected_before is set after the first ConnAck, so later
    // ConnAcks are known to be reconnects.
    connected_before: bool,
}

impl MqttBus {
    // new creates the client half (used for requests, usually wrapped
    // as the router's BusTransport) and the event loop half.
    pub fn new(options: &BusOptions) -> (AsyncClient, MqttBus) {
        let (client, eventloop) =
            AsyncClient::new(options.to_mqtt_options(), options.channel_capacity);
        let bus = MqttBus {
            eventloop,
            reconnect_delay: options.reconnect_delay,
            connected_before: false,
        };
        (client, bus)
    }

    // run_until polls the broker connection and dispatches inbound
    // messages until shutdown completes. Shutdown also interrupts a
    // dispatch that is still in flight.
    pub async fn run_until<F>(mut self, router: Arc<TopicRouter>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                _ = &mut shutdown => break,
                event = self.eventloop.poll() => event,
            };

            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.handle_event(&router, event) => {}
            }
        }
        info!("Bus event loop stopped");
    }

    async fn handle_event(&mut self, router: &TopicRouter, event: Result<Event, ConnectionError>) {
        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = InboundMessage::from_publish(&publish);
                debug!(topic = %message.topic, bytes = message.payload.len(), "Received message");
                router.dispatch(&message).await;
            }
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(session_present = ack.session_present, "Connected to broker");
                if needs_resubscribe(self.connected_before, ack.session_present) {
                    router.resubscribe_enabled().await;
                }
                self.connected_before = true;
            }
            Ok(_) => {}
            Err(e) => {
                router.record_event_loop_error();
                warn!(
                    error = %e,
                    retry_in_secs = self.reconnect_delay.as_secs_f64(),
                    "MQTT connection error"
                );
                tokio::time::sleep(self.reconnect_delay).await;
            }
        }
    }
}

// needs_resubscribe is true for a reconnect where the broker did not
// keep our session (and so forgot our subscriptions). The first
// connect sends whatever subscribe requests are already queued.
fn needs_resubscribe(connected_before: bool, session_present: bool) -> bool {
    connected_before && !session_present
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_resubscribe() {
        assert!(!needs_resubscribe(false, false));
        assert!(!needs_resubscribe(false, true));
        assert!(needs_resubscribe(true, false));
        assert!(!needs_resubscribe(true, true));
    }
}
