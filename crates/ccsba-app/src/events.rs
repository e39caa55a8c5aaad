//! In-process event bridge.
//!
//! A write in one component is observed by the others through two
//! mechanisms, mirroring the web client's `CustomEvent` + `setInterval` pair:
//! a broadcast channel for same-process subscribers, and fixed-interval
//! [`Poller`] tasks that re-read state and republish it as the
//! reconciliation fallback (the feed poller re-reads the post collection,
//! the badge poller recounts a user's unread totals).  Subscribers
//! re-derive their view from the payload rather than applying a delta.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use ccsba_store::{Post, Profile, Store};

/// Named events carried by the bridge: `newPost`, `postsUpdate`,
/// `profileUpdate`, `badgeUpdate`.
#[derive(Debug, Clone)]
pub enum AppEvent {
    NewPost(Post),
    PostsUpdate(Vec<Post>),
    ProfileUpdate {
        email: String,
        profile: Profile,
    },
    /// Current header badge counts for one user.
    BadgeUpdate {
        email: String,
        unread_messages: usize,
        unread_notifications: usize,
    },
}

impl AppEvent {
    /// The DOM event name the web client used, kept for log context.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::NewPost(_) => "newPost",
            AppEvent::PostsUpdate(_) => "postsUpdate",
            AppEvent::ProfileUpdate { .. } => "profileUpdate",
            AppEvent::BadgeUpdate { .. } => "badgeUpdate",
        }
    }
}

/// Cloneable publish/subscribe handle.
pub struct EventBridge {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBridge {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Publish an event.  Never blocks; an event with no live subscribers
    /// is simply dropped.
    pub fn publish(&self, event: AppEvent) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(event = name, receivers, "published"),
            Err(_) => tracing::trace!(event = name, "no subscribers"),
        }
    }
}

impl Clone for EventBridge {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Background reconciliation task; aborted on drop, matching the web
/// client's interval teardown on component unmount.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Re-read the post collection every `interval` and publish it as a
    /// `postsUpdate`, so components that missed an in-process event (or
    /// share the store from another process) converge eventually.
    pub fn spawn_posts(store: Arc<Store>, bridge: EventBridge, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick fires immediately; skip it so a fresh poller
            // does not race the initial load
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match store.posts() {
                    Ok(posts) => bridge.publish(AppEvent::PostsUpdate(posts)),
                    Err(e) => tracing::warn!(error = %e, "posts poll failed"),
                }
            }
        });
        Self { handle }
    }

    /// Recount a user's unread messages and notifications every `interval`
    /// and publish the pair as a `badgeUpdate`.  The web client's header
    /// ran the same recount on its own timer rather than tracking deltas.
    pub fn spawn_badges(
        store: Arc<Store>,
        bridge: EventBridge,
        email: String,
        interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let counts = store
                    .unread_inbound_count(&email)
                    .and_then(|m| Ok((m, store.unread_notification_count(&email)?)));
                match counts {
                    Ok((unread_messages, unread_notifications)) => {
                        bridge.publish(AppEvent::BadgeUpdate {
                            email: email.clone(),
                            unread_messages,
                            unread_notifications,
                        })
                    }
                    Err(e) => tracing::warn!(error = %e, "badge poll failed"),
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccsba_shared::constants::POSTS_KEY;

    #[tokio::test]
    async fn publish_reaches_live_subscriber() {
        let bridge = EventBridge::default();
        let mut rx = bridge.subscribe();

        bridge.publish(AppEvent::ProfileUpdate {
            email: "jane@x.com".into(),
            profile: Profile {
                email: "jane@x.com".into(),
                ..Default::default()
            },
        });

        match rx.recv().await.unwrap() {
            AppEvent::ProfileUpdate { email, .. } => assert_eq!(email, "jane@x.com"),
            other => panic!("unexpected event {}", other.name()),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bridge = EventBridge::default();
        bridge.publish(AppEvent::PostsUpdate(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn badge_poller_reports_unread_counts() {
        use ccsba_shared::NotificationKind;
        use ccsba_store::Notification;

        let store = Arc::new(Store::in_memory().unwrap());
        store
            .push_notification(Notification {
                id: "1".into(),
                kind: NotificationKind::Like,
                text: "liked your post".into(),
                actor_name: "Jane".into(),
                recipient: "kay@x.com".into(),
                timestamp: chrono::Utc::now(),
                read: false,
                post_content: None,
            })
            .unwrap();

        let bridge = EventBridge::default();
        let mut rx = bridge.subscribe();
        let _poller = Poller::spawn_badges(
            store,
            bridge,
            "kay@x.com".into(),
            Duration::from_secs(5),
        );

        match rx.recv().await.unwrap() {
            AppEvent::BadgeUpdate {
                email,
                unread_messages,
                unread_notifications,
            } => {
                assert_eq!(email, "kay@x.com");
                assert_eq!(unread_messages, 0);
                assert_eq!(unread_notifications, 1);
            }
            other => panic!("unexpected event {}", other.name()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poller_republishes_posts() {
        let store = Arc::new(Store::in_memory().unwrap());
        store.set(POSTS_KEY, &Vec::<Post>::new()).unwrap();

        let bridge = EventBridge::default();
        let mut rx = bridge.subscribe();
        let _poller = Poller::spawn_posts(store, bridge, Duration::from_secs(2));

        match rx.recv().await.unwrap() {
            AppEvent::PostsUpdate(posts) => assert!(posts.is_empty()),
            other => panic!("unexpected event {}", other.name()),
        }
    }
}
