//! Messaging engine: direct messages and conversation views.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use ccsba_shared::{DomainError, NotificationKind};
use ccsba_store::{time_id, Message, Notification, Store};

use crate::error::Result;

/// One entry in the conversation list: the counterpart, the most recent
/// message either way, and how many of their messages are still unread.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub other_party: String,
    pub last_message: Message,
    pub unread_count: usize,
}

pub struct MessagingEngine {
    store: Arc<Store>,
}

impl MessagingEngine {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Send a direct message and notify the recipient.
    pub fn send_message(&self, sender: &str, recipient: &str, content: &str) -> Result<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let message = self.store.push_message(Message {
            id: time_id(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            read: false,
            sender_profile: None,
        })?;

        self.store.push_notification(Notification {
            id: time_id(),
            kind: NotificationKind::Message,
            text: "sent you a message".to_string(),
            actor_name: self.store.display_name_for(sender)?,
            recipient: recipient.to_string(),
            timestamp: Utc::now(),
            read: false,
            post_content: None,
        })?;

        Ok(message)
    }

    /// Group all of `user`'s messages by counterpart: one summary per
    /// distinct other party, most recently active first.
    pub fn list_conversations(&self, user: &str) -> Result<Vec<ConversationSummary>> {
        let mut by_counterpart: HashMap<String, Vec<Message>> = HashMap::new();
        for message in self.store.messages_touching(user)? {
            let other = if message.sender == user {
                message.recipient.clone()
            } else {
                message.sender.clone()
            };
            by_counterpart.entry(other).or_default().push(message);
        }

        let mut summaries: Vec<ConversationSummary> = by_counterpart
            .into_iter()
            .map(|(other_party, messages)| {
                let unread_count = messages
                    .iter()
                    .filter(|m| m.sender == other_party && m.recipient == user && !m.read)
                    .count();
                let last_message = messages
                    .into_iter()
                    .max_by_key(|m| m.timestamp)
                    .expect("grouped conversations are never empty");
                ConversationSummary {
                    other_party,
                    last_message,
                    unread_count,
                }
            })
            .collect();

        summaries.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
        Ok(summaries)
    }

    /// Open the conversation with `other`: all messages between the pair,
    /// oldest first.
    ///
    /// Side effect replicated from the web client's message list: EVERY inbound
    /// message of `user` is marked read, not just this conversation's
    /// (see DESIGN.md).
    pub fn open_conversation(&self, user: &str, other: &str) -> Result<Vec<Message>> {
        self.store.mark_inbound_read(user)?;
        Ok(self.store.conversation(user, other)?)
    }

    /// Unread inbound total for the header badge.
    pub fn unread_total(&self, user: &str) -> Result<usize> {
        Ok(self.store.unread_inbound_count(user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn engine() -> (MessagingEngine, Arc<Store>) {
        let store = Arc::new(Store::in_memory().unwrap());
        (MessagingEngine::new(store.clone()), store)
    }

    #[test]
    fn send_notifies_recipient() {
        let (engine, store) = engine();
        let message = engine.send_message("a@x.com", "b@x.com", "Hi").unwrap();
        assert!(!message.read);

        let notifications = store.notifications_for("b@x.com").unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Message);
        assert_eq!(notifications[0].text, "sent you a message");
    }

    #[test]
    fn blank_message_is_rejected() {
        let (engine, store) = engine();
        let err = engine.send_message("a@x.com", "b@x.com", "  ").unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::EmptyContent)));
        assert!(store.messages().unwrap().is_empty());
    }

    #[test]
    fn conversations_group_by_counterpart() {
        let (engine, _) = engine();
        engine.send_message("a@x.com", "b@x.com", "one").unwrap();
        engine.send_message("b@x.com", "a@x.com", "two").unwrap();
        engine.send_message("c@x.com", "a@x.com", "three").unwrap();

        let summaries = engine.list_conversations("a@x.com").unwrap();
        assert_eq!(summaries.len(), 2);

        // most recently active counterpart first
        assert_eq!(summaries[0].other_party, "c@x.com");
        assert_eq!(summaries[0].unread_count, 1);
        assert_eq!(summaries[0].last_message.content, "three");

        assert_eq!(summaries[1].other_party, "b@x.com");
        assert_eq!(summaries[1].unread_count, 1);
        assert_eq!(summaries[1].last_message.content, "two");
    }

    #[test]
    fn open_conversation_marks_read_and_orders_oldest_first() {
        let (engine, _) = engine();
        engine.send_message("a@x.com", "b@x.com", "Hi").unwrap();
        engine.send_message("b@x.com", "a@x.com", "Hello back").unwrap();

        assert_eq!(engine.unread_total("b@x.com").unwrap(), 1);

        let convo = engine.open_conversation("b@x.com", "a@x.com").unwrap();
        assert_eq!(convo.len(), 2);
        assert_eq!(convo[0].content, "Hi");
        assert!(convo[0].read);

        assert_eq!(engine.unread_total("b@x.com").unwrap(), 0);

        let summaries = engine.list_conversations("b@x.com").unwrap();
        assert_eq!(summaries[0].unread_count, 0);
    }
}
