//! Profile repository: `profile_<email>` records, plus the denormalization
//! propagation rule.

use ccsba_shared::constants::{profile_key, DEFAULT_AVATAR_URL, MESSAGES_KEY, POSTS_KEY};

use crate::error::Result;
use crate::models::{AuthorRef, Message, Post, Profile, SenderProfile};
use crate::store::Store;

impl Store {
    /// Load a profile.  Profiles are created lazily; `Ok(None)` is the
    /// normal state for a member who never edited theirs.
    pub fn profile(&self, email: &str) -> Result<Option<Profile>> {
        self.get(&profile_key(email))
    }

    /// Persist a profile and apply the denormalization propagation rule:
    /// the author snapshot embedded in every post owned by this email, and
    /// the sender display snapshot on every message sent by it, are
    /// rewritten so historical content reflects the latest name/avatar.
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let email = profile.email.clone();
        let display_name = profile.display_name();
        let avatar = profile.avatar.clone();

        self.set(&profile_key(&email), profile)?;

        self.update::<Vec<Post>, _, _>(POSTS_KEY, |posts| {
            for post in posts.iter_mut().filter(|p| p.author.email == email) {
                post.author.name = display_name.clone();
                post.author.avatar = avatar.clone();
            }
        })?;

        self.update::<Vec<Message>, _, _>(MESSAGES_KEY, |messages| {
            for msg in messages.iter_mut().filter(|m| m.sender == email) {
                msg.sender_profile = Some(SenderProfile {
                    name: display_name.clone(),
                    avatar: avatar.clone(),
                });
            }
        })?;

        Ok(())
    }

    /// Display name for an email, resolved through the lazy profile.
    pub fn display_name_for(&self, email: &str) -> Result<String> {
        Ok(self
            .profile(email)?
            .map(|p| p.display_name())
            .unwrap_or_else(|| email.to_string()))
    }

    /// Author snapshot for new posts and comments by this email, with the
    /// platform default avatar when none is set.
    pub fn author_ref(&self, email: &str) -> Result<AuthorRef> {
        let profile = self.profile(email)?;
        Ok(AuthorRef {
            name: profile
                .as_ref()
                .map(|p| p.display_name())
                .unwrap_or_else(|| email.to_string()),
            email: email.to_string(),
            avatar: Some(
                profile
                    .and_then(|p| p.avatar)
                    .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            ),
        })
    }
}
