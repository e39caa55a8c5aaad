use serde::{Deserialize, Serialize};

/// Session role.  The UI treats roles as binary (admin tier vs. member);
/// `BoardMember` exists so the opaque token round-trips losslessly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    BoardMember,
    Member,
}

impl Role {
    /// Whether this role sees moderation and user-management actions.
    pub fn is_admin_tier(self) -> bool {
        matches!(self, Role::Admin | Role::BoardMember)
    }

    /// The opaque token persisted under the `authToken` key.
    pub fn token(self) -> &'static str {
        match self {
            Role::Admin => "admin-token",
            Role::BoardMember => "board-member-token",
            Role::Member => "user-token",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "admin-token" => Some(Role::Admin),
            "board-member-token" => Some(Role::BoardMember),
            "user-token" => Some(Role::Member),
            _ => None,
        }
    }
}

/// A reaction a viewer can leave on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    ThumbsUp,
}

impl ReactionKind {
    /// Notification body shown to the post author.
    pub fn notification_text(self) -> &'static str {
        match self {
            ReactionKind::Like => "liked your post",
            ReactionKind::ThumbsUp => "gave a thumbs up to your post",
        }
    }

    pub fn notification_kind(self) -> NotificationKind {
        match self {
            ReactionKind::Like => NotificationKind::Like,
            ReactionKind::ThumbsUp => NotificationKind::ThumbsUp,
        }
    }
}

/// Kind tag on a fan-out notification record.  Serialized as the camelCase
/// strings already present in stored data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Like,
    ThumbsUp,
    Comment,
    Message,
    Warning,
    System,
}
