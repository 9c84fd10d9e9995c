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

// src/router/subscription.rs
// Topic subscriptions and the match predicate used by the router.
//
// A subscription is either an exact topic or a prefix subscription
// written with a trailing '#'. Matching is plain byte comparison:
// "sensors/#" accepts anything starting with "sensors/", and there is
// no single-level '+' wildcard.

use crate::errors::MqttCameraError;

// WILDCARD_MARKER is the trailing marker meaning "this prefix and
// everything beneath it".
pub const WILDCARD_MARKER: char = '#';

// MatchMode is fixed when the subscription is built.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MatchMode {
    Exact,
    Prefix(String),
}

// Subscription is one topic pattern a handler is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    // pattern is the topic filter as configured, and is what
    // gets sent to the broker on subscribe.
    pattern: String,
    mode: MatchMode,
}

impl Subscription {
    // new builds a subscription from a topic pattern. A pattern ending
    // in '#' becomes a prefix subscription on everything before it.
    pub fn new(pattern: impl Into<String>) -> Result<Self, MqttCameraError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(MqttCameraError::invalid_topic_pattern(
                "topic pattern must not be empty",
            ));
        }

        let mode = match pattern.strip_suffix(WILDCARD_MARKER) {
            Some(prefix) => MatchMode::Prefix(prefix.to_string()),
            None => MatchMode::Exact,
        };

        Ok(Self { pattern, mode })
    }

    // pattern returns the topic filter as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    // is_wildcard is true iff the pattern ends with the wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.mode, MatchMode::Prefix(_))
    }

    // match_prefix returns the pattern without its trailing marker,
    // for wildcard subscriptions only.
    pub fn match_prefix(&self) -> Option<&str> {
        match &self.mode {
            MatchMode::Prefix(prefix) => Some(prefix),
            MatchMode::Exact => None,
        }
    }

    // matches checks whether an inbound topic is accepted by this
    // subscription.
    pub fn matches(&self, topic: &str) -> bool {
        match &self.mode {
            MatchMode::Exact => self.pattern == topic,
            MatchMode::Prefix(prefix) => topic.starts_with(prefix.as_str()),
        }
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_subscription() {
        let sub = Subscription::new("home/door/bell").unwrap();
        assert!(!sub.is_wildcard());
        assert_eq!(sub.match_prefix(), None);
        assert!(sub.matches("home/door/bell"));
        assert!(!sub.matches("home/door/bell/extra"));
        assert!(!sub.matches("home/door"));
        assert!(!sub.matches("Home/door/bell"));
    }

    #[test]
    fn test_wildcard_subscription() {
        let sub = Subscription::new("sensors/#").unwrap();
        assert!(sub.is_wildcard());
        assert_eq!(sub.match_prefix(), Some("sensors/"));
        assert!(sub.matches("sensors/cam1/trigger"));
        assert!(sub.matches("sensors/"));
        assert!(!sub.matches("sensor/cam1"));
        assert!(!sub.matches("sensors"));
    }

    #[test]
    fn test_match_everything() {
        let sub = Subscription::new("#").unwrap();
        assert_eq!(sub.match_prefix(), Some(""));
        assert!(sub.matches(""));
        assert!(sub.matches("anything/at/all"));
    }

    #[test]
    fn test_marker_only_counts_at_the_end() {
        let sub = Subscription::new("a/#/b").unwrap();
        assert!(!sub.is_wildcard());
        assert!(sub.matches("a/#/b"));
        assert!(!sub.matches("a/x/b"));
    }

    #[test]
    fn test_plus_is_literal() {
        let sub = Subscription::new("rooms/+/motion").unwrap();
        assert!(!sub.matches("rooms/kitchen/motion"));
        assert!(sub.matches("rooms/+/motion"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = Subscription::new("").unwrap_err();
        assert!(err.is_registry_error());
    }

    #[test]
    fn test_display() {
        let sub = Subscription::new("camera/snap").unwrap();
        assert_eq!(sub.to_string(), "'camera/snap'");
    }
}
