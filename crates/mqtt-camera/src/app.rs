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

// src/app.rs
// Wires validated settings into a running service: bus client and
// event loop, router, and the camera trigger bound to the configured
// topic.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::bus::MqttBus;
use crate::capture::{CaptureBackend, CaptureController};
use crate::config::Settings;
use crate::errors::MqttCameraError;
use crate::router::TopicRouter;
use crate::trigger::CameraTrigger;

// TRIGGER_KEY is the registration key of the camera trigger.
pub const TRIGGER_KEY: &str = "camera";

pub struct App {
    router: Arc<TopicRouter>,
    trigger: Arc<CameraTrigger>,
    bus: MqttBus,
}

impl App {
    // build assembles the service and requests the trigger's
    // subscription. Nothing talks to the broker until run_until.
    pub async fn build(
        settings: Settings,
        backend: Arc<dyn CaptureBackend>,
    ) -> Result<Self, MqttCameraError> {
        let (client, bus) = MqttBus::new(&settings.bus);
        let router = Arc::new(
            TopicRouter::new(Arc::new(client))
                .with_unmatched_warnings(settings.warn_on_unmatched_topic),
        );

        let controller = CaptureController::new(backend).with_policy(settings.retry);
        let trigger = Arc::new(
            CameraTrigger::new(controller, settings.request, settings.hook)
                .with_detached_exec(settings.detach_exec),
        );

        info!(
            topic = %settings.subscription,
            device = trigger.request().device_index(),
            output = %trigger.request().output_dir().display(),
            "Binding camera trigger"
        );
        router
            .register(TRIGGER_KEY, settings.subscription, trigger.clone())
            .await;
        router.set_enabled(TRIGGER_KEY, true).await?;

        Ok(Self {
            router,
            trigger,
            bus,
        })
    }

    pub fn router(&self) -> &Arc<TopicRouter> {
        &self.router
    }

    pub fn trigger(&self) -> &Arc<CameraTrigger> {
        &self.trigger
    }

    // run_until serves messages until shutdown completes, then logs
    // the final counters.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Self {
            router,
            trigger,
            bus,
        } = self;

        bus.run_until(router.clone(), shutdown).await;

        let dispatch = router.stats();
        let captures = trigger.stats();
        info!(
            dispatched = dispatch.total_dispatched,
            unmatched = dispatch.total_unmatched,
            handler_failures = dispatch.total_handler_failures,
            connection_errors = dispatch.total_event_loop_errors,
            triggers = captures.total_triggers,
            captured = captures.total_captured,
            exhausted = captures.total_exhausted,
            "Shutting down"
        );
    }
}
