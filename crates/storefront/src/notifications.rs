//! Toast notifications.
//!
//! The notifier owns the active toast list and publishes the full list on a
//! `watch` channel after every change. Subscribers unsubscribe by dropping
//! their receiver.

use chrono::{DateTime, Duration, Utc};
use quickcart_core::{ToastId, ToastKind};
use serde::Serialize;
use tokio::sync::watch;

/// How long a toast stays visible unless told otherwise.
pub const DEFAULT_DURATION_MS: u32 = 3000;

/// A transient message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: ToastKind,
    pub duration_ms: u32,
    pub expires_at: DateTime<Utc>,
}

/// Active toasts plus their subscribers.
#[derive(Debug)]
pub struct Notifier {
    toasts: Vec<Toast>,
    next_id: u64,
    sender: watch::Sender<Vec<Toast>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            toasts: Vec::new(),
            next_id: 0,
            sender,
        }
    }

    pub fn success(&mut self, title: impl Into<String>, description: Option<String>) -> ToastId {
        self.push(ToastKind::Success, title.into(), description)
    }

    pub fn error(&mut self, title: impl Into<String>, description: Option<String>) -> ToastId {
        self.push(ToastKind::Error, title.into(), description)
    }

    pub fn info(&mut self, title: impl Into<String>, description: Option<String>) -> ToastId {
        self.push(ToastKind::Info, title.into(), description)
    }

    /// Show a toast with an explicit duration. Expired toasts are dropped
    /// first, so the list stays bounded without a reader sweeping it.
    pub fn show(
        &mut self,
        kind: ToastKind,
        title: String,
        description: Option<String>,
        duration_ms: u32,
    ) -> ToastId {
        let now = Utc::now();
        self.drop_expired(now);

        self.next_id += 1;
        let id = ToastId::new(format!("toast-{}", self.next_id));
        let expires_at = now + Duration::milliseconds(i64::from(duration_ms));

        tracing::debug!(toast_id = %id, ?kind, %title, "Toast shown");
        self.toasts.push(Toast {
            id: id.clone(),
            title,
            description,
            kind,
            duration_ms,
            expires_at,
        });
        self.publish();
        id
    }

    fn push(&mut self, kind: ToastKind, title: String, description: Option<String>) -> ToastId {
        self.show(kind, title, description, DEFAULT_DURATION_MS)
    }

    /// Remove a toast. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id.as_str() != id);
        let removed = self.toasts.len() != before;
        if removed {
            self.publish();
        }
        removed
    }

    /// Drop every toast whose expiry is at or before `now`.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let removed = self.drop_expired(now);
        if removed > 0 {
            self.publish();
        }
        removed
    }

    fn drop_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        before - self.toasts.len()
    }

    #[must_use]
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    /// Receive the full toast list after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self) {
        // send_replace stores the value even with no receivers
        self.sender.send_replace(self.toasts.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut notifier = Notifier::new();
        let a = notifier.success("Added to cart", None);
        let b = notifier.error("Invalid coupon", Some("Try FIRST100".to_string()));
        assert_eq!(a.as_str(), "toast-1");
        assert_eq!(b.as_str(), "toast-2");
        assert_eq!(notifier.active().len(), 2);
        assert_eq!(notifier.active()[1].kind, ToastKind::Error);
        assert_eq!(notifier.active()[0].duration_ms, DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_dismiss() {
        let mut notifier = Notifier::new();
        let id = notifier.info("Hello", None);
        assert!(notifier.dismiss(id.as_str()));
        assert!(!notifier.dismiss(id.as_str()));
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_sweep_drops_expired() {
        let mut notifier = Notifier::new();
        notifier.show(ToastKind::Info, "short".to_string(), None, 10);
        notifier.show(ToastKind::Info, "long".to_string(), None, 60_000);

        let removed = notifier.sweep(Utc::now() + Duration::seconds(1));
        assert_eq!(removed, 1);
        assert_eq!(notifier.active()[0].title, "long");
    }

    #[test]
    fn test_show_drops_expired_toasts() {
        let mut notifier = Notifier::new();
        for _ in 0..100 {
            notifier.show(ToastKind::Info, "flash".to_string(), None, 0);
        }
        std::thread::sleep(std::time::Duration::from_millis(5));

        let mut rx = notifier.subscribe();
        notifier.show(ToastKind::Success, "live".to_string(), None, 60_000);

        assert_eq!(notifier.active().len(), 1);
        assert_eq!(notifier.active()[0].title, "live");
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let mut notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        notifier.success("One", None);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        notifier.success("Two", None);
        assert_eq!(rx.borrow_and_update().len(), 2);

        drop(rx);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.success("Three", None);
        assert_eq!(notifier.active().len(), 3);
    }
}
