// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Interaction preferences for the topology editor.

use serde::{Deserialize, Serialize};

/// Keyboard modifier that can be bound to a drag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    /// Shift.
    #[default]
    Shift,
    /// Alt / Option.
    Alt,
    /// Control.
    Ctrl,
    /// Meta / Command.
    Meta,
}

/// Saved preferences for the graph interaction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionPrefs {
    /// Modifier that turns a node drag into a regroup.
    pub regroup_modifier: ModifierKey,
    /// Error notification behaviour.
    pub notifications: NotificationPrefs,
}

/// Notification queue tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    /// How long an error notification stays visible, in milliseconds.
    pub ttl_ms: u64,
    /// Maximum queued notifications; the oldest is evicted first.
    pub max_visible: usize,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            ttl_ms: 8_000,
            max_visible: 5,
        }
    }
}
