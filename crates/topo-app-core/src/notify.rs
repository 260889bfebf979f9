// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dismissible notifications with TTL + dedupe, and the port the interaction
//! engine reports failed gestures through.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::prefs::NotificationPrefs;

/// Sink for user-facing notifications.
pub trait Notifier {
    /// Surface a dismissible error. `title` names the attempted action,
    /// `message` carries the underlying cause.
    fn error(&mut self, title: &str, message: &str);
}

/// Identifier for a queued notification.
pub type NotificationId = u64;

/// Error notification stored in the center.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Stable identifier.
    pub id: NotificationId,
    /// Short title line.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Time-to-live.
    pub ttl: Duration,
    /// Creation (or last dedupe refresh) time.
    pub created: Instant,
}

/// Bounded in-memory notification queue.
pub struct NotificationCenter {
    queue: VecDeque<Notification>,
    max: usize,
    ttl: Duration,
    dedupe_window: Duration,
    next_id: NotificationId,
}

impl NotificationCenter {
    /// Create a center using the given preferences.
    pub fn new(prefs: &NotificationPrefs) -> Self {
        Self {
            queue: VecDeque::new(),
            max: prefs.max_visible.max(1),
            ttl: Duration::from_millis(prefs.ttl_ms),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Queue a notification. An identical entry pushed within the dedupe
    /// window is refreshed instead of duplicated.
    pub fn push<T, M>(
        &mut self,
        title: T,
        message: M,
        now: Instant,
    ) -> NotificationId
    where
        T: Into<String>,
        M: Into<String>,
    {
        let title = title.into();
        let message = message.into();

        if let Some(existing) = self.queue.iter_mut().find(|n| {
            n.title == title
                && n.message == message
                && now.saturating_duration_since(n.created) <= self.dedupe_window
        }) {
            existing.created = now;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            id,
            title,
            message,
            ttl: self.ttl,
            created: now,
        });
        id
    }

    /// Remove a notification the user dismissed. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    /// Drop expired notifications.
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue
            .retain(|n| now.saturating_duration_since(n.created) < n.ttl);
    }

    /// Notifications still within their TTL, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<&Notification> {
        self.queue
            .iter()
            .filter(|n| now.saturating_duration_since(n.created) < n.ttl)
            .collect()
    }

    /// Number of queued notifications, expired or not.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Notifier for NotificationCenter {
    fn error(&mut self, title: &str, message: &str) {
        self.push(title, message, Instant::now());
    }
}
