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

// src/bus/options.rs
// Connection options for the MQTT bus.
use std::time::Duration;

use rumqttc::MqttOptions;

// DEFAULT_CLIENT_ID is the client id used when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "mqttCamera";

// DEFAULT_PORT is the plain MQTT port.
pub const DEFAULT_PORT: u16 = 1883;

// DEFAULT_KEEP_ALIVE is the keepalive interval sent to the broker.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

// DEFAULT_RECONNECT_DELAY is how long the event loop waits after a
// connection error before polling (and so reconnecting) again.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

// DEFAULT_CHANNEL_CAPACITY is the number of outbound requests the
// client queues before try_* requests start failing.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// BusOptions describes how to reach the broker.
#[derive(Clone, Debug)]
pub struct BusOptions {
    pub client_id: String,
    pub host: String,
    pub port: u16,
    // credentials are applied to the connection when present.
    pub credentials: Option<ClientCredentials>,
    pub keep_alive: Duration,
    // clean_session asks the broker not to keep subscriptions across
    // connections; the event loop resubscribes on reconnect instead.
    pub clean_session: bool,
    pub channel_capacity: usize,
    pub reconnect_delay: Duration,
}

impl BusOptions {
    // new creates options for host with every other field defaulted.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            host: host.into(),
            port: DEFAULT_PORT,
            credentials: None,
            keep_alive: DEFAULT_KEEP_ALIVE,
            clean_session: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    // to_mqtt_options builds the rumqttc connection options.
    pub fn to_mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(self.clean_session);
        if let Some(credentials) = &self.credentials {
            options.set_credentials(credentials.username.clone(), credentials.password.clone());
        }
        options
    }
}

// ClientCredentials are used for providing a username
// and password to the MQTT server.
#[derive(Clone)]
pub struct ClientCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BusOptions::new("broker.local");
        assert_eq!(options.client_id, "mqttCamera");
        assert_eq!(options.port, 1883);
        assert_eq!(options.keep_alive, Duration::from_secs(60));
        assert!(options.credentials.is_none());
    }

    #[test]
    fn test_to_mqtt_options() {
        let options = BusOptions::new("broker.local")
            .with_client_id("porch-cam")
            .with_port(8883)
            .with_keep_alive(Duration::from_secs(30))
            .with_credentials(ClientCredentials {
                username: "cam".to_string(),
                password: "secret".to_string(),
            });

        let mqtt = options.to_mqtt_options();
        assert_eq!(mqtt.client_id(), "porch-cam");
        assert_eq!(mqtt.broker_address(), ("broker.local".to_string(), 8883));
        assert_eq!(mqtt.keep_alive(), Duration::from_secs(30));
        assert!(mqtt.clean_session());
        assert_eq!(
            mqtt.credentials(),
            Some(("cam".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = ClientCredentials {
            username: "cam".to_string(),
            password: "secret".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("cam"));
        assert!(!rendered.contains("secret"));
    }
}
