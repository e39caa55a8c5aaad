//! Post repository: the `ccsba_all_posts` collection, newest first.

use chrono::Utc;

use ccsba_shared::constants::{
    ADMIN_DISPLAY_NAME, DEFAULT_AVATAR_URL, OPERATOR_EMAILS, POSTS_KEY, WELCOME_POST_CONTENT,
};
use ccsba_shared::ReactionKind;

use crate::error::Result;
use crate::models::{AuthorRef, Comment, Post};
use crate::store::Store;

impl Store {
    /// Load the full feed, newest first.
    ///
    /// An absent collection (first run) is seeded with the welcome post,
    /// matching the web client's first feed load.  An empty-but-present
    /// collection is left alone.
    pub fn posts(&self) -> Result<Vec<Post>> {
        if let Some(posts) = self.get::<Vec<Post>>(POSTS_KEY)? {
            return Ok(posts);
        }

        let welcome = vec![welcome_post()];
        self.set(POSTS_KEY, &welcome)?;
        tracing::info!("seeded feed with welcome post");
        Ok(welcome)
    }

    pub fn find_post(&self, post_id: &str) -> Result<Option<Post>> {
        Ok(self.posts()?.into_iter().find(|p| p.id == post_id))
    }

    /// Posts authored by `email`, feed order.
    pub fn posts_by(&self, email: &str) -> Result<Vec<Post>> {
        Ok(self
            .posts()?
            .into_iter()
            .filter(|p| p.author.email == email)
            .collect())
    }

    /// Prepend a post.  Ids are time-derived; a same-millisecond collision
    /// is resolved by bumping, keeping the uniqueness invariant.
    pub fn add_post(&self, mut post: Post) -> Result<Post> {
        self.update::<Vec<Post>, _, _>(POSTS_KEY, |posts| {
            while posts.iter().any(|p| p.id == post.id) {
                post.id = match post.id.parse::<u64>() {
                    Ok(n) => (n + 1).to_string(),
                    Err(_) => format!("{}0", post.id),
                };
            }
            posts.insert(0, post.clone());
            post
        })
    }

    /// Append a comment to a post, oldest first.  Returns the updated post,
    /// or `None` (silent no-op) when the id is unknown.
    pub fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Option<Post>> {
        self.update::<Vec<Post>, _, _>(POSTS_KEY, |posts| {
            posts.iter_mut().find(|p| p.id == post_id).map(|post| {
                post.comments.push(comment);
                post.clone()
            })
        })
    }

    /// Increment one reaction counter by exactly 1.  Returns the updated
    /// post, or `None` (silent no-op) when the id is unknown.
    pub fn increment_reaction(&self, post_id: &str, kind: ReactionKind) -> Result<Option<Post>> {
        self.update::<Vec<Post>, _, _>(POSTS_KEY, |posts| {
            posts.iter_mut().find(|p| p.id == post_id).map(|post| {
                match kind {
                    ReactionKind::Like => post.likes += 1,
                    ReactionKind::ThumbsUp => post.thumbs_up += 1,
                }
                post.clone()
            })
        })
    }

    /// Remove a post and all its comments permanently.  Returns whether a
    /// post was removed.
    pub fn delete_post(&self, post_id: &str) -> Result<bool> {
        self.update::<Vec<Post>, _, _>(POSTS_KEY, |posts| {
            let before = posts.len();
            posts.retain(|p| p.id != post_id);
            posts.len() != before
        })
    }
}

fn welcome_post() -> Post {
    Post {
        id: "1".to_string(),
        author: AuthorRef {
            name: ADMIN_DISPLAY_NAME.to_string(),
            email: OPERATOR_EMAILS[0].to_string(),
            avatar: Some(DEFAULT_AVATAR_URL.to_string()),
        },
        content: WELCOME_POST_CONTENT.to_string(),
        image: None,
        video: None,
        link: None,
        link_preview: None,
        timestamp: Utc::now(),
        likes: 0,
        thumbs_up: 0,
        comments: vec![],
    }
}
