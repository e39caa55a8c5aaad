//! Top-level application assembly.

use std::sync::Arc;

use std::time::Duration;

use ccsba_shared::constants::{BADGE_POLL_INTERVAL, FEED_POLL_INTERVAL};
use ccsba_store::Store;

use crate::admin::AdminEngine;
use crate::error::Result;
use crate::events::{EventBridge, Poller};
use crate::feed::FeedEngine;
use crate::messaging::MessagingEngine;
use crate::notify::NotificationEngine;
use crate::profile::ProfileEngine;
use crate::session::SessionManager;

/// Poll cadences, overridable from the environment.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Feed reconciliation interval.
    /// Env: `FEED_POLL_SECS`
    /// Default: 2s
    pub feed: Duration,

    /// Header badge refresh interval.
    /// Env: `BADGE_POLL_SECS`
    /// Default: 5s
    pub badge: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            feed: FEED_POLL_INTERVAL,
            badge: BADGE_POLL_INTERVAL,
        }
    }
}

impl PollConfig {
    /// Load cadences from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secs) = std::env::var("FEED_POLL_SECS") {
            match secs.parse::<u64>() {
                Ok(n) if n > 0 => config.feed = Duration::from_secs(n),
                _ => tracing::warn!(value = %secs, "Invalid FEED_POLL_SECS, using default"),
            }
        }

        if let Ok(secs) = std::env::var("BADGE_POLL_SECS") {
            match secs.parse::<u64>() {
                Ok(n) if n > 0 => config.badge = Duration::from_secs(n),
                _ => tracing::warn!(value = %secs, "Invalid BADGE_POLL_SECS, using default"),
            }
        }

        config
    }
}

/// One process-wide handle over the shared store and every engine.
pub struct App {
    pub store: Arc<Store>,
    pub bridge: EventBridge,
    pub sessions: SessionManager,
    pub feed: FeedEngine,
    pub messaging: MessagingEngine,
    pub notifications: NotificationEngine,
    pub profiles: ProfileEngine,
    pub admin: AdminEngine,
}

impl App {
    /// Open the on-disk store in the platform data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::with_store(Arc::new(Store::new()?)))
    }

    pub fn with_store(store: Arc<Store>) -> Self {
        let bridge = EventBridge::default();
        Self {
            sessions: SessionManager::new(store.clone()),
            feed: FeedEngine::new(store.clone(), bridge.clone()),
            messaging: MessagingEngine::new(store.clone()),
            notifications: NotificationEngine::new(store.clone()),
            profiles: ProfileEngine::new(store.clone(), bridge.clone()),
            admin: AdminEngine::new(store.clone()),
            bridge,
            store,
        }
    }

    /// Start the feed reconciliation poller.  The returned handle keeps
    /// the task alive; drop it to stop polling.
    pub fn spawn_feed_poller(&self, config: &PollConfig) -> Poller {
        Poller::spawn_posts(self.store.clone(), self.bridge.clone(), config.feed)
    }

    /// Start the header badge poller for a signed-in user.  Spawned on
    /// login and dropped on logout, like the header's unread-count timer
    /// in the web client.
    pub fn spawn_badge_poller(&self, config: &PollConfig, email: &str) -> Poller {
        Poller::spawn_badges(
            self.store.clone(),
            self.bridge.clone(),
            email.to_string(),
            config.badge,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AppEvent;

    #[test]
    fn poll_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.feed, Duration::from_secs(2));
        assert_eq!(config.badge, Duration::from_secs(5));
    }

    #[test]
    fn engines_share_one_store() {
        let app = App::with_store(Arc::new(Store::in_memory().unwrap()));

        app.admin.add_user("jane@x.com", false).unwrap();
        let session = app.sessions.login("jane@x.com", "CBD").unwrap();

        // the feed engine sees the credential the admin engine wrote
        assert_eq!(app.notifications.unread_count_for(&session.email).unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn badge_poller_runs_on_configured_cadence() {
        let app = App::with_store(Arc::new(Store::in_memory().unwrap()));
        // add_user leaves one unread welcome notification behind
        app.admin.add_user("jane@x.com", false).unwrap();

        let mut rx = app.bridge.subscribe();
        let _poller = app.spawn_badge_poller(&PollConfig::default(), "jane@x.com");

        match rx.recv().await.unwrap() {
            AppEvent::BadgeUpdate {
                email,
                unread_messages,
                unread_notifications,
            } => {
                assert_eq!(email, "jane@x.com");
                assert_eq!(unread_messages, 0);
                assert_eq!(unread_notifications, 1);
            }
            other => panic!("unexpected event {}", other.name()),
        }
    }
}
