//! Platform constants.
//!
//! Storage keys and the fixed credential scheme are part of the external
//! interface: they must match the layout existing deployments already have
//! in their key-value store.

use std::time::Duration;

/// Key holding the array of [`Credential`](../types) records.
pub const CREDENTIALS_KEY: &str = "userCredentials";

/// Key holding the array of posts, newest first.
pub const POSTS_KEY: &str = "ccsba_all_posts";

/// Key holding the flat array of direct messages.
pub const MESSAGES_KEY: &str = "ccsba_messages";

/// Key holding the array of fan-out notification records, newest first.
pub const NOTIFICATIONS_KEY: &str = "ccsba_notification_details";

/// Session identity: opaque role token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Session identity: current user email.
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Per-user profile key prefix; the full key is `profile_<email>`.
pub const PROFILE_KEY_PREFIX: &str = "profile_";

/// Build the storage key for a user's profile record.
pub fn profile_key(email: &str) -> String {
    format!("{PROFILE_KEY_PREFIX}{email}")
}

/// The two hardcoded operator addresses that always get an admin session.
pub const OPERATOR_EMAILS: [&str; 2] = ["info@ctcannabisalliance.org", "mike@sweetheal.com"];

/// Fixed passphrase for the admin tier (operators and board members).
pub const ADMIN_PASSPHRASE: &str = "THC";

/// Fixed passphrase for the member tier.
pub const MEMBER_PASSPHRASE: &str = "CBD";

/// Display name used for admin-originated notifications and the welcome post.
pub const ADMIN_DISPLAY_NAME: &str = "CCSBA Admin";

/// Avatar used when a member has not uploaded one.
pub const DEFAULT_AVATAR_URL: &str = "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80";

/// Content of the post seeded into an empty feed.
pub const WELCOME_POST_CONTENT: &str =
    "Welcome to the CCSBA platform! Stay connected with the Connecticut cannabis community.";

/// Feed reconciliation poll cadence.
pub const FEED_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Header badge (messages / notifications) poll cadence.
pub const BADGE_POLL_INTERVAL: Duration = Duration::from_secs(5);
