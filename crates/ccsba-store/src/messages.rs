//! Message repository: the flat `ccsba_messages` collection.

use ccsba_shared::constants::MESSAGES_KEY;

use crate::error::Result;
use crate::models::Message;
use crate::store::Store;

impl Store {
    pub fn messages(&self) -> Result<Vec<Message>> {
        self.get_or_default(MESSAGES_KEY)
    }

    /// Append a message to the collection.
    pub fn push_message(&self, message: Message) -> Result<Message> {
        self.update::<Vec<Message>, _, _>(MESSAGES_KEY, |messages| {
            messages.push(message.clone());
            message
        })
    }

    /// All messages where `user` is either party, collection order.
    pub fn messages_touching(&self, user: &str) -> Result<Vec<Message>> {
        Ok(self
            .messages()?
            .into_iter()
            .filter(|m| m.sender == user || m.recipient == user)
            .collect())
    }

    /// All messages between the unordered pair, oldest first.
    pub fn conversation(&self, user: &str, other: &str) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages()?
            .into_iter()
            .filter(|m| {
                (m.sender == user && m.recipient == other)
                    || (m.sender == other && m.recipient == user)
            })
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Flip `read` on every message addressed to `user`.
    ///
    /// Deliberately broad: ALL inbound messages are marked, across all
    /// counterparts, exactly as the web client does on any message-list load
    /// (flagged in DESIGN.md).  Returns how many flipped.
    pub fn mark_inbound_read(&self, user: &str) -> Result<usize> {
        self.update::<Vec<Message>, _, _>(MESSAGES_KEY, |messages| {
            let mut flipped = 0;
            for msg in messages.iter_mut().filter(|m| m.recipient == user && !m.read) {
                msg.read = true;
                flipped += 1;
            }
            flipped
        })
    }

    /// Unread inbound count for the header badge.
    pub fn unread_inbound_count(&self, user: &str) -> Result<usize> {
        Ok(self
            .messages()?
            .iter()
            .filter(|m| m.recipient == user && !m.read)
            .count())
    }
}
