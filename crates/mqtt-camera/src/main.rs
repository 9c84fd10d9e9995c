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

use std::sync::Arc;

use clap::Parser;
use eyre::WrapErr;
use mqtt_camera::capture::{CaptureBackend, V4lBackend};
use mqtt_camera::cli::Options;
use mqtt_camera::{App, Config};
use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

// Captures and the bus event loop share one thread; device work is
// pushed to the blocking pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), eyre::Report> {
    let options = Options::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("rumqttc=warn".parse()?);
    let fmt_layer = if options.log_json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()?;

    let config = Config::try_from(options).wrap_err("Failed to load configuration")?;
    let settings = config.validate().wrap_err("Invalid configuration")?;

    let output_dir = settings.request.output_dir().to_path_buf();
    tokio::fs::create_dir_all(&output_dir)
        .await
        .wrap_err_with(|| format!("Failed to create output directory {}", output_dir.display()))?;

    tracing::info!(
        host = %settings.bus.host,
        port = settings.bus.port,
        client_id = %settings.bus.client_id,
        "Starting mqtt-camera"
    );

    // A camera that is missing or cannot deliver MJPG is not fatal here
    // (it may be plugged in later), but say so up front.
    let backend = V4lBackend::new();
    let device_index = settings.request.device_index();
    match backend.open(device_index) {
        Ok(mut device) => device.release(),
        Err(e) => tracing::warn!(
            device = device_index,
            error = %e,
            "Capture device is not usable yet; captures will fail until it is \
             (only cameras with MJPG output are supported)"
        ),
    }

    let app = App::build(settings, Arc::new(backend))
        .await
        .wrap_err("Failed to start camera trigger")?;
    app.run_until(shutdown_signal()).await;

    Ok(())
}

// shutdown_signal completes on Ctrl-C. If the signal handler cannot be
// installed the service keeps running until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
