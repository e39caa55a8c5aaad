//! Notification engine: fan-out records and the unread badge.

use std::sync::Arc;

use chrono::Utc;

use ccsba_shared::NotificationKind;
use ccsba_store::{time_id, Notification, Store};

use crate::error::Result;

pub struct NotificationEngine {
    store: Arc<Store>,
}

impl NotificationEngine {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Append one unread record addressed to a single recipient.  Fan-out
    /// to N recipients is N independent calls, never a broadcast record.
    pub fn notify(
        &self,
        recipient: &str,
        kind: NotificationKind,
        text: &str,
        actor_name: &str,
        post_content: Option<String>,
    ) -> Result<Notification> {
        Ok(self.store.push_notification(Notification {
            id: time_id(),
            kind,
            text: text.to_string(),
            actor_name: actor_name.to_string(),
            recipient: recipient.to_string(),
            timestamp: Utc::now(),
            read: false,
            post_content,
        })?)
    }

    pub fn notifications_for(&self, user: &str) -> Result<Vec<Notification>> {
        Ok(self.store.notifications_for(user)?)
    }

    pub fn unread_count_for(&self, user: &str) -> Result<usize> {
        Ok(self.store.unread_notification_count(user)?)
    }

    /// Panel-open semantics: mark everything addressed to `user` read and
    /// return the records for display.  Called when the panel opens, not on
    /// every poll.
    pub fn open_panel(&self, user: &str) -> Result<Vec<Notification>> {
        self.store.mark_all_notifications_read(user)?;
        Ok(self.store.notifications_for(user)?)
    }

    /// Bulk mark-read; returns the now-current (zero) unread count.
    pub fn mark_all_read_for(&self, user: &str) -> Result<usize> {
        self.store.mark_all_notifications_read(user)?;
        Ok(self.store.unread_notification_count(user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_all_read_returns_zero() {
        let store = Arc::new(Store::in_memory().unwrap());
        let engine = NotificationEngine::new(store);

        engine
            .notify("a@x.com", NotificationKind::System, "Your account has been created", "CCSBA Admin", None)
            .unwrap();
        engine
            .notify("a@x.com", NotificationKind::Like, "liked your post", "Jane", Some("hi".into()))
            .unwrap();

        assert_eq!(engine.unread_count_for("a@x.com").unwrap(), 2);
        assert_eq!(engine.mark_all_read_for("a@x.com").unwrap(), 0);
        assert!(engine
            .notifications_for("a@x.com")
            .unwrap()
            .iter()
            .all(|n| n.read));
    }

    #[test]
    fn open_panel_marks_and_returns() {
        let store = Arc::new(Store::in_memory().unwrap());
        let engine = NotificationEngine::new(store);

        engine
            .notify("a@x.com", NotificationKind::Message, "sent you a message", "Bob", None)
            .unwrap();

        let panel = engine.open_panel("a@x.com").unwrap();
        assert_eq!(panel.len(), 1);
        assert!(panel[0].read);
        assert_eq!(engine.unread_count_for("a@x.com").unwrap(), 0);
    }
}
