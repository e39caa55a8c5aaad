//! Records persisted in the shared key-value store.
//!
//! Field names serialize in camelCase so the JSON layout is byte-compatible
//! with what existing deployments already hold under each key.  Email
//! strings are the only foreign keys; there is no relational integrity
//! beyond convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ccsba_shared::NotificationKind;

/// Time-derived record id, milliseconds since the epoch as a string
/// (the web client's `Date.now().toString()`).
pub fn time_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// A provisioned account.  At most one record per email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub email: String,
    /// Fixed tier marker: `"THC"` for the admin tier, `"CBD"` for members.
    pub password: String,
    /// Member-chosen password, set via the change-password flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub date_added: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A member profile, created lazily; may not exist even if a credential
/// does.  Mutated only by its owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub website: String,
    /// Avatar image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Banner image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl Profile {
    /// Display name resolution used everywhere content is rendered:
    /// business name, falling back to personal name, falling back to email.
    pub fn display_name(&self) -> String {
        if !self.business_name.is_empty() {
            self.business_name.clone()
        } else if !self.name.is_empty() {
            self.name.clone()
        } else {
            self.email.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// Author snapshot embedded in posts and comments.  Denormalized by design:
/// profile saves retroactively rewrite these snapshots (see
/// [`Store::save_profile`](crate::Store::save_profile)).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Preview card attached to a post link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub url: String,
}

/// A feed post.  The collection is newest-first; `comments` is
/// insertion-ordered, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: AuthorRef,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<LinkPreview>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub thumbs_up: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: AuthorRef,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Sender display snapshot on a message, kept in sync by profile saves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SenderProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A direct message between two members.  `read` flips to true only when
/// the recipient's client loads the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_profile: Option<SenderProfile>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Fan-out notification record: exactly one recipient per record, never a
/// broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub text: String,
    pub actor_name: String,
    pub recipient: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_through() {
        let mut profile = Profile {
            email: "jane@x.com".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "jane@x.com");

        profile.name = "Jane".into();
        assert_eq!(profile.display_name(), "Jane");

        profile.business_name = "Jane's Greenhouse".into();
        assert_eq!(profile.display_name(), "Jane's Greenhouse");
    }

    #[test]
    fn post_serializes_camel_case_and_omits_absent_media() {
        let post = Post {
            id: "1".into(),
            author: AuthorRef {
                name: "Jane".into(),
                email: "jane@x.com".into(),
                avatar: None,
            },
            content: "hello".into(),
            image: None,
            video: None,
            link: None,
            link_preview: None,
            timestamp: Utc::now(),
            likes: 0,
            thumbs_up: 3,
            comments: vec![],
        };

        let json = serde_json::to_string(&post).unwrap();
        assert!(json.contains("\"thumbsUp\":3"));
        assert!(!json.contains("\"image\""));
        assert!(!json.contains("linkPreview"));
    }

    #[test]
    fn notification_kind_round_trips_under_type_field() {
        let n = Notification {
            id: "1".into(),
            kind: NotificationKind::ThumbsUp,
            text: "gave a thumbs up to your post".into(),
            actor_name: "Jane".into(),
            recipient: "bob@x.com".into(),
            timestamp: Utc::now(),
            read: false,
            post_content: Some("hi".into()),
        };

        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"type\":\"thumbsUp\""));
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
