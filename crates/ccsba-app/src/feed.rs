//! Feed engine: posting, reactions, comments, moderation.
//!
//! Every mutation notifies the affected author with exactly one fan-out
//! record and republishes the collection over the event bridge so the other
//! components converge without a reload.

use std::sync::Arc;

use chrono::Utc;

use ccsba_shared::constants::ADMIN_DISPLAY_NAME;
use ccsba_shared::{DomainError, NotificationKind, ReactionKind};
use ccsba_store::{time_id, LinkPreview, Comment, Notification, Post, Store};

use crate::error::Result;
use crate::events::{AppEvent, EventBridge};
use crate::session::Session;

/// Optional attachments for a new post.  Content itself is mandatory.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub link: Option<String>,
    pub link_preview: Option<LinkPreview>,
}

impl PostDraft {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

pub struct FeedEngine {
    store: Arc<Store>,
    bridge: EventBridge,
}

impl FeedEngine {
    pub fn new(store: Arc<Store>, bridge: EventBridge) -> Self {
        Self { store, bridge }
    }

    /// The feed, newest first (seeded on first load).
    pub fn posts(&self) -> Result<Vec<Post>> {
        Ok(self.store.posts()?)
    }

    /// Create a post authored by `author_email` and announce it as a
    /// `newPost` event.
    pub fn create_post(&self, author_email: &str, draft: PostDraft) -> Result<Post> {
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        // load first so a fresh store gets its welcome post beneath ours,
        // as the feed always mounts before any compose
        let _ = self.store.posts()?;

        let post = Post {
            id: time_id(),
            author: self.store.author_ref(author_email)?,
            content: content.to_string(),
            image: draft.image,
            video: draft.video,
            link: draft.link,
            link_preview: draft.link_preview,
            timestamp: Utc::now(),
            likes: 0,
            thumbs_up: 0,
            comments: vec![],
        };

        let post = self.store.add_post(post)?;
        self.bridge.publish(AppEvent::NewPost(post.clone()));
        Ok(post)
    }

    /// React to a post.  A self-reaction is silently ignored; otherwise the
    /// matching counter goes up by exactly 1 and the author gets one
    /// notification.  Repeat reactions from the same viewer all count.
    pub fn react(&self, post_id: &str, kind: ReactionKind, actor_email: &str) -> Result<()> {
        let Some(post) = self.store.find_post(post_id)? else {
            return Ok(());
        };
        if post.author.email == actor_email {
            return Ok(());
        }

        let Some(updated) = self.store.increment_reaction(post_id, kind)? else {
            return Ok(());
        };

        self.store.push_notification(Notification {
            id: time_id(),
            kind: kind.notification_kind(),
            text: kind.notification_text().to_string(),
            actor_name: self.store.display_name_for(actor_email)?,
            recipient: updated.author.email.clone(),
            timestamp: Utc::now(),
            read: false,
            post_content: Some(updated.content.clone()),
        })?;

        self.bridge.publish(AppEvent::PostsUpdate(self.store.posts()?));
        Ok(())
    }

    /// Comment on a post.  Appended oldest-first; the author is notified
    /// unless they commented on their own post.  Unknown ids are a silent
    /// no-op.
    pub fn comment(&self, post_id: &str, content: &str, actor_email: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let comment = Comment {
            id: time_id(),
            author: self.store.author_ref(actor_email)?,
            content: content.to_string(),
            timestamp: Utc::now(),
        };

        let Some(post) = self.store.add_comment(post_id, comment)? else {
            return Ok(());
        };

        if post.author.email != actor_email {
            self.store.push_notification(Notification {
                id: time_id(),
                kind: NotificationKind::Comment,
                text: "commented on your post".to_string(),
                actor_name: self.store.display_name_for(actor_email)?,
                recipient: post.author.email.clone(),
                timestamp: Utc::now(),
                read: false,
                post_content: Some(post.content.clone()),
            })?;
        }

        self.bridge.publish(AppEvent::PostsUpdate(self.store.posts()?));
        Ok(())
    }

    /// Delete a post.  Permitted for the admin tier and for the post's own
    /// author; anyone else is a logged no-op.  No notification is emitted.
    pub fn delete_post(&self, post_id: &str, session: &Session) -> Result<bool> {
        let Some(post) = self.store.find_post(post_id)? else {
            return Ok(false);
        };

        if !session.is_admin_tier() && post.author.email != session.email {
            tracing::warn!(post_id, actor = %session.email, "delete refused");
            return Ok(false);
        }

        let deleted = self.store.delete_post(post_id)?;
        if deleted {
            self.bridge.publish(AppEvent::PostsUpdate(self.store.posts()?));
        }
        Ok(deleted)
    }

    /// Flag a post's author with a warning notification quoting the post.
    /// Admin tier only; the post itself is not altered.
    pub fn warn(&self, post_id: &str, session: &Session) -> Result<bool> {
        if !session.is_admin_tier() {
            tracing::warn!(post_id, actor = %session.email, "warn refused");
            return Ok(false);
        }
        let Some(post) = self.store.find_post(post_id)? else {
            return Ok(false);
        };

        self.store.push_notification(Notification {
            id: time_id(),
            kind: NotificationKind::Warning,
            text: "Your post has been flagged as potentially inappropriate by an admin"
                .to_string(),
            actor_name: ADMIN_DISPLAY_NAME.to_string(),
            recipient: post.author.email.clone(),
            timestamp: Utc::now(),
            read: false,
            post_content: Some(post.content.clone()),
        })?;
        Ok(true)
    }
}
