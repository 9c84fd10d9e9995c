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

// src/cli.rs
// Command line options. Anything given here overrides the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

#[derive(Parser, Debug, Default)]
#[clap(
    name = "mqtt-camera",
    about = "Capture a still image whenever a matching MQTT message arrives"
)]
pub struct Options {
    #[clap(long, help = "Path to TOML configuration file")]
    pub config_file: Option<PathBuf>,

    #[clap(short = 'c', long, help = "MQTT client id [default: mqttCamera]")]
    pub client_id: Option<String>,

    #[clap(short = 's', long, help = "MQTT broker host")]
    pub host: Option<String>,

    #[clap(short = 'p', long, help = "MQTT broker port [default: 1883]")]
    pub port: Option<u16>,

    #[clap(short = 'u', long, help = "MQTT username")]
    pub username: Option<String>,

    #[clap(
        short = 'k',
        long,
        env = "MQTT_CAMERA_PASSWORD",
        hide_env_values = true,
        help = "MQTT password"
    )]
    pub password: Option<String>,

    #[clap(
        short = 't',
        long,
        help = "Topic to subscribe to; a trailing '#' matches any suffix [default: #]"
    )]
    pub topic: Option<String>,

    #[clap(
        short = 'i',
        long,
        help = "Capture device index, 0 for /dev/video0 [default: 0]"
    )]
    pub capture_index: Option<u32>,

    #[clap(short = 'r', long, help = "Capture resolution as WIDTHxHEIGHT")]
    pub resolution: Option<String>,

    #[clap(
        short = 'f',
        long = "skip",
        help = "Frames to discard before capturing [default: 0]"
    )]
    pub skip_frames: Option<u32>,

    #[clap(
        short = 'o',
        long,
        help = "Directory captured images are written to [default: .]"
    )]
    pub output_path: Option<PathBuf>,

    #[clap(
        short = 'e',
        long = "exec",
        help = "Command run after each capture; the image path is appended as its last argument"
    )]
    pub exec_command: Option<String>,

    #[clap(long, help = "Run the exec command in the background")]
    pub detach_exec: bool,

    #[clap(long, help = "Log as JSON instead of plain text")]
    pub log_json: bool,
}

impl TryFrom<Options> for Config {
    type Error = ConfigError;

    fn try_from(options: Options) -> Result<Self, Self::Error> {
        let mut config = if let Some(config_path) = &options.config_file {
            Config::load(config_path)?
        } else {
            Config::default()
        };

        if let Some(client_id) = options.client_id {
            config.client_id = client_id;
        }
        if let Some(host) = options.host {
            config.host = Some(host);
        }
        if let Some(port) = options.port {
            config.port = port;
        }
        if let Some(username) = options.username {
            config.username = Some(username);
        }
        if let Some(password) = options.password {
            config.password = Some(password);
        }
        if let Some(topic) = options.topic {
            config.topic = topic;
        }
        if let Some(capture_index) = options.capture_index {
            config.capture_index = capture_index;
        }
        if let Some(resolution) = options.resolution {
            config.resolution = Some(resolution);
        }
        if let Some(skip_frames) = options.skip_frames {
            config.skip_frames = skip_frames;
        }
        if let Some(output_path) = options.output_path {
            config.output_path = output_path;
        }
        if let Some(exec_command) = options.exec_command {
            config.exec_command = Some(exec_command);
        }
        if options.detach_exec {
            config.detach_exec = true;
        }

        Ok(config)
    }
}
