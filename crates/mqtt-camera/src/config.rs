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

// src/config.rs
// Config is read from the TOML file (every field has a default) and then
// overridden from the command line. Config::validate turns it into
// Settings, the typed values the service is built from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::bus::{
    BusOptions, ClientCredentials, DEFAULT_CLIENT_ID, DEFAULT_KEEP_ALIVE, DEFAULT_PORT,
    DEFAULT_RECONNECT_DELAY,
};
use crate::capture::{CaptureRequest, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, Resolution, RetryPolicy};
use crate::hook::PostProcessHook;
use crate::router::Subscription;

const DEFAULT_TOPIC: &str = "#";
const DEFAULT_OUTPUT_PATH: &str = ".";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "Defaults::client_id")]
    pub client_id: String,
    // Required, but may come from either the file or the CLI.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "Defaults::port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    // A trailing '#' makes it a prefix match.
    #[serde(default = "Defaults::topic")]
    pub topic: String,
    // 0 for /dev/video0.
    #[serde(default)]
    pub capture_index: u32,
    // WIDTHxHEIGHT
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub skip_frames: u32,
    #[serde(default = "Defaults::output_path")]
    pub output_path: PathBuf,
    // Run after each successful capture with the file path appended.
    #[serde(default)]
    pub exec_command: Option<String>,
    #[serde(default = "Defaults::keep_alive_secs")]
    pub keep_alive_secs: u64,
    #[serde(default = "Defaults::reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    #[serde(default)]
    pub detach_exec: bool,
    #[serde(default = "Defaults::warn_on_unmatched_topic")]
    pub warn_on_unmatched_topic: bool,
    #[serde(default = "Defaults::capture_attempts")]
    pub capture_attempts: u32,
    #[serde(default = "Defaults::retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

pub struct Defaults;

impl Defaults {
    pub fn client_id() -> String {
        DEFAULT_CLIENT_ID.to_string()
    }
    pub fn port() -> u16 {
        DEFAULT_PORT
    }
    pub fn topic() -> String {
        DEFAULT_TOPIC.to_string()
    }
    pub fn output_path() -> PathBuf {
        DEFAULT_OUTPUT_PATH.into()
    }
    pub fn keep_alive_secs() -> u64 {
        DEFAULT_KEEP_ALIVE.as_secs()
    }
    pub fn reconnect_delay_secs() -> u64 {
        DEFAULT_RECONNECT_DELAY.as_secs()
    }
    pub fn warn_on_unmatched_topic() -> bool {
        true
    }
    pub fn capture_attempts() -> u32 {
        DEFAULT_MAX_ATTEMPTS
    }
    pub fn retry_backoff_ms() -> u64 {
        DEFAULT_BACKOFF.as_millis() as u64
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
    #[error("Invalid TOML in config file: {path}: {error}")]
    InvalidToml {
        path: String,
        error: toml::de::Error,
    },
    #[error("No MQTT host configured (use --host or set host in the config file)")]
    MissingHost,
    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: Defaults::client_id(),
            host: None,
            port: Defaults::port(),
            username: None,
            password: None,
            topic: Defaults::topic(),
            capture_index: 0,
            resolution: None,
            skip_frames: 0,
            output_path: Defaults::output_path(),
            exec_command: None,
            keep_alive_secs: Defaults::keep_alive_secs(),
            reconnect_delay_secs: Defaults::reconnect_delay_secs(),
            detach_exec: false,
            warn_on_unmatched_topic: Defaults::warn_on_unmatched_topic(),
            capture_attempts: Defaults::capture_attempts(),
            retry_backoff_ms: Defaults::retry_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bus: BusOptions,
    pub subscription: Subscription,
    pub request: CaptureRequest,
    pub retry: RetryPolicy,
    pub hook: PostProcessHook,
    pub detach_exec: bool,
    pub warn_on_unmatched_topic: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        toml::from_str::<Self>(&cfg).map_err(|error| ConfigError::InvalidToml {
            path: path.to_string_lossy().to_string(),
            error,
        })
    }

    // validate checks the configuration and builds Settings. Credentials
    // are only applied when a username is set; a password on its own is
    // ignored.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(ConfigError::MissingHost)?;

        let resolution = Resolution::parse_optional(self.resolution.as_deref())
            .map_err(|e| ConfigError::InvalidResolution(e.to_string()))?;

        let subscription = Subscription::new(self.topic.clone())
            .map_err(|e| ConfigError::InvalidTopic(e.to_string()))?;

        let mut bus = BusOptions::new(host)
            .with_client_id(self.client_id.clone())
            .with_port(self.port)
            .with_keep_alive(Duration::from_secs(self.keep_alive_secs))
            .with_reconnect_delay(Duration::from_secs(self.reconnect_delay_secs));
        if let Some(username) = &self.username {
            bus = bus.with_credentials(ClientCredentials {
                username: username.clone(),
                password: self.password.clone().unwrap_or_default(),
            });
        }

        let request = CaptureRequest::new(self.capture_index, self.output_path.clone())
            .with_resolution(resolution)
            .with_frames_to_skip(self.skip_frames);

        Ok(Settings {
            bus,
            subscription,
            request,
            retry: RetryPolicy::new(
                self.capture_attempts,
                Duration::from_millis(self.retry_backoff_ms),
            ),
            hook: PostProcessHook::new(self.exec_command.clone()),
            detach_exec: self.detach_exec,
            warn_on_unmatched_topic: self.warn_on_unmatched_topic,
        })
    }
}
