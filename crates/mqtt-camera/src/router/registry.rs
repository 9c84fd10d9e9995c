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

// src/router/registry.rs
// SubscriberRegistry: keyed subscription bindings in registration order.
//
// Entries live in a Vec so matching visits handlers in the order they
// were registered. Registering an existing key replaces that entry in
// place and keeps its position.

use std::sync::Arc;

use super::handlers::{InboundMessage, MessageHandler};
use super::subscription::Subscription;

// RegistryEntry binds one subscription to its handler.
pub struct RegistryEntry {
    // key is the unique registration key.
    pub key: String,
    pub subscription: Subscription,
    pub handler: Arc<dyn MessageHandler>,
    // enabled records whether a subscribe request was last issued
    // for this entry; it does not gate local matching.
    pub enabled: bool,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("key", &self.key)
            .field("subscription", &self.subscription)
            .field("handler", &"<handler>")
            .field("enabled", &self.enabled)
            .finish()
    }
}

// SubscriberRegistry owns all bindings for one router.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    entries: Vec<RegistryEntry>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // insert adds a binding, or replaces the binding already stored
    // under the same key. Returns true if an existing binding was
    // replaced. A replaced binding starts out disabled again.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        subscription: Subscription,
        handler: Arc<dyn MessageHandler>,
    ) -> bool {
        let entry = RegistryEntry {
            key: key.into(),
            subscription,
            handler,
            enabled: false,
        };

        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.entries.push(entry);
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RegistryEntry> {
        self.entries.iter_mut().find(|e| e.key == key)
    }

    // remove drops the binding stored under key, if any.
    pub fn remove(&mut self, key: &str) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(index))
    }

    // matching returns the handlers of every subscription that accepts
    // the message topic, in registration order.
    pub fn matching(&self, message: &InboundMessage) -> Vec<(String, Arc<dyn MessageHandler>)> {
        self.entries
            .iter()
            .filter(|e| e.subscription.matches(&message.topic))
            .map(|e| (e.key.clone(), e.handler.clone()))
            .collect()
    }

    // enabled_patterns returns the topic patterns of every enabled entry.
    pub fn enabled_patterns(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.subscription.pattern().to_string())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
