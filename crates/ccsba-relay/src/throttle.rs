//! Per-sender throttling for the mail endpoint.
//!
//! The relay exposes a single write operation, so the throttle is a plain
//! fixed-window counter keyed by client address. The relay listens on the
//! socket directly, without a reverse proxy in front, so the peer address
//! from the connection is the client address.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

struct SendWindow {
    opened: Instant,
    sent: u32,
}

/// Caps how many sends a single client address may make per window.
pub struct MailThrottle {
    windows: Mutex<HashMap<IpAddr, SendWindow>>,
    max_per_window: u32,
    window: Duration,
}

impl MailThrottle {
    /// The app fires one message per user action, so a handful per minute
    /// covers legitimate use.
    pub const DEFAULT_MAX_PER_WINDOW: u32 = 5;
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_per_window,
            window,
        }
    }

    /// Records a send attempt from `ip` and says whether it may proceed.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let entry = windows.entry(ip).or_insert(SendWindow {
            opened: now,
            sent: 0,
        });
        if now.duration_since(entry.opened) >= self.window {
            entry.opened = now;
            entry.sent = 0;
        }
        if entry.sent < self.max_per_window {
            entry.sent += 1;
            true
        } else {
            false
        }
    }

    /// Drops windows that have fully elapsed. Called periodically so the
    /// map does not grow with every address that ever hit the relay.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        windows.retain(|_, w| now.duration_since(w.opened) < self.window);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MailThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PER_WINDOW, Self::DEFAULT_WINDOW)
    }
}

pub async fn throttle_middleware(
    State(throttle): State<Arc<MailThrottle>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if !throttle.allow(addr.ip()) {
        tracing::warn!(client = %addr.ip(), "send quota exhausted");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }
    Ok(next.run(request).await)
}
