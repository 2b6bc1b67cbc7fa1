//! Toast notifications shown after user actions.
//!
//! Front ends push into a [`Notifications`] queue and render whatever is
//! visible. Success toasts expire on their own; errors stay until
//! dismissed.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn auto_dismiss_after(&self) -> Option<Duration> {
        match self {
            Severity::Success => Some(Duration::from_secs(3)),
            Severity::Error => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    message: String,
    created_at: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::next(),
            severity,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn expired_at(&self, now: Instant) -> bool {
        self.severity
            .auto_dismiss_after()
            .is_some_and(|ttl| now.saturating_duration_since(self.created_at) >= ttl)
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    visible: VecDeque<Notification>,
    queued: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_back(notification);
        } else {
            self.queued.push_back(notification);
        }
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id == id) {
            self.visible.remove(pos);
            self.promote();
            return true;
        }
        if let Some(pos) = self.queued.iter().position(|n| n.id == id) {
            self.queued.remove(pos);
            return true;
        }
        false
    }

    /// Drops visible toasts whose time is up.
    pub fn tick(&mut self, now: Instant) {
        let before = self.visible.len();
        self.visible.retain(|n| !n.expired_at(now));
        if self.visible.len() < before {
            self.promote();
        }
    }

    /// Hands every notification over, visible first. Used by the CLI, which
    /// prints toasts instead of keeping them on screen.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut all: Vec<_> = self.visible.drain(..).collect();
        all.extend(self.queued.drain(..));
        all
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    pub fn len(&self) -> usize {
        self.visible.len() + self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn promote(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            let Some(next) = self.queued.pop_front() else {
                break;
            };
            self.visible.push_back(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_queued_and_promoted_on_dismiss() {
        let mut toasts = Notifications::new();
        let first = Notification::error("one");
        let first_id = first.id();
        toasts.push(first);
        toasts.push(Notification::error("two"));
        toasts.push(Notification::error("three"));
        toasts.push(Notification::error("four"));

        assert_eq!(toasts.visible().count(), 3);
        assert_eq!(toasts.len(), 4);

        assert!(toasts.dismiss(first_id));
        assert_eq!(toasts.visible().count(), 3);
        assert!(toasts.visible().any(|n| n.message() == "four"));
    }

    #[test]
    fn success_expires_but_error_stays() {
        let mut toasts = Notifications::new();
        toasts.push(Notification::success("saved"));
        toasts.push(Notification::error("broken"));

        toasts.tick(Instant::now() + Duration::from_secs(10));

        let remaining: Vec<_> = toasts.visible().map(|n| n.message()).collect();
        assert_eq!(remaining, vec!["broken"]);
    }

    #[test]
    fn drain_returns_in_push_order() {
        let mut toasts = Notifications::new();
        toasts.push(Notification::success("a"));
        toasts.push(Notification::error("b"));

        let drained: Vec<_> = toasts.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["a", "b"]);
        assert!(toasts.is_empty());
    }

    #[test]
    fn promotion_keeps_arrival_order() {
        let mut toasts = Notifications::new();
        let mut ids = Vec::new();
        for message in ["a", "b", "c", "d"] {
            let toast = Notification::error(message);
            ids.push(toast.id());
            toasts.push(toast);
        }

        assert!(toasts.dismiss(ids[1]));

        let visible: Vec<_> = toasts.visible().map(|n| n.message()).collect();
        assert_eq!(visible, vec!["a", "c", "d"]);

        let drained: Vec<_> = toasts.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["a", "c", "d"]);
    }
}
