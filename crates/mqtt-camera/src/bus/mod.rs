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

// src/bus/mod.rs
// Message bus glue on top of rumqttc: connection options, the outbound
// request trait and the inbound event loop.

mod event_loop;
mod options;
mod transport;

pub use event_loop::MqttBus;
pub use options::{
    BusOptions, ClientCredentials, DEFAULT_CHANNEL_CAPACITY, DEFAULT_CLIENT_ID,
    DEFAULT_KEEP_ALIVE, DEFAULT_PORT, DEFAULT_RECONNECT_DELAY,
};
pub use transport::{BusTransport, DEFAULT_QOS, PublishOptions};
