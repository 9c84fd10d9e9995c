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

// src/router/mod.rs
// Router module exports: subscriptions, the registry, handlers and
// the TopicRouter that ties them together.

mod core;
mod handlers;
mod registry;
mod subscription;

pub use self::core::TopicRouter;

pub use handlers::{ClosureAdapter, InboundMessage, MessageHandler};
pub use registry::{RegistryEntry, SubscriberRegistry};
pub use subscription::{Subscription, WILDCARD_MARKER};
