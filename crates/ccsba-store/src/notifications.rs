//! Notification repository: the `ccsba_notification_details` collection,
//! newest first, one record per recipient.

use ccsba_shared::constants::NOTIFICATIONS_KEY;

use crate::error::Result;
use crate::models::Notification;
use crate::store::Store;

impl Store {
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        self.get_or_default(NOTIFICATIONS_KEY)
    }

    /// Prepend a new unread record.
    pub fn push_notification(&self, notification: Notification) -> Result<Notification> {
        self.update::<Vec<Notification>, _, _>(NOTIFICATIONS_KEY, |notifications| {
            notifications.insert(0, notification.clone());
            notification
        })
    }

    /// Records addressed to `user`, newest first.
    pub fn notifications_for(&self, user: &str) -> Result<Vec<Notification>> {
        Ok(self
            .notifications()?
            .into_iter()
            .filter(|n| n.recipient == user)
            .collect())
    }

    pub fn unread_notification_count(&self, user: &str) -> Result<usize> {
        Ok(self
            .notifications()?
            .iter()
            .filter(|n| n.recipient == user && !n.read)
            .count())
    }

    /// Flip `read` on every record addressed to `user`.  Returns how many
    /// flipped.  Called when the recipient opens the notification panel,
    /// not on every poll.
    pub fn mark_all_notifications_read(&self, user: &str) -> Result<usize> {
        self.update::<Vec<Notification>, _, _>(NOTIFICATIONS_KEY, |notifications| {
            let mut flipped = 0;
            for n in notifications
                .iter_mut()
                .filter(|n| n.recipient == user && !n.read)
            {
                n.read = true;
                flipped += 1;
            }
            flipped
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccsba_shared::NotificationKind;
    use chrono::Utc;

    fn notification(id: &str, recipient: &str) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Like,
            text: "liked your post".into(),
            actor_name: "Jane".into(),
            recipient: recipient.to_string(),
            timestamp: Utc::now(),
            read: false,
            post_content: None,
        }
    }

    #[test]
    fn records_prepend_newest_first() {
        let store = Store::in_memory().unwrap();
        store.push_notification(notification("1", "a@x.com")).unwrap();
        store.push_notification(notification("2", "a@x.com")).unwrap();

        let all = store.notifications().unwrap();
        assert_eq!(all[0].id, "2");
        assert_eq!(all[1].id, "1");
    }

    #[test]
    fn mark_all_read_zeroes_unread_for_recipient_only() {
        let store = Store::in_memory().unwrap();
        store.push_notification(notification("1", "a@x.com")).unwrap();
        store.push_notification(notification("2", "a@x.com")).unwrap();
        store.push_notification(notification("3", "b@x.com")).unwrap();

        assert_eq!(store.unread_notification_count("a@x.com").unwrap(), 2);
        assert_eq!(store.mark_all_notifications_read("a@x.com").unwrap(), 2);
        assert_eq!(store.unread_notification_count("a@x.com").unwrap(), 0);

        assert!(store
            .notifications_for("a@x.com")
            .unwrap()
            .iter()
            .all(|n| n.read));
        assert_eq!(store.unread_notification_count("b@x.com").unwrap(), 1);
    }
}
