//! # ccsba-app
//!
//! Application core for the CCSBA member-community platform: session and
//! access control, the event bridge that keeps independently-polling UI
//! components in sync, and the feed / messaging / notification / profile
//! engines.  All state lives in the shared [`ccsba_store::Store`]; there is
//! no server of record.  The mail relay and link-preview fetch are
//! best-effort collaborators that never gate a store write.

pub mod admin;
pub mod events;
pub mod feed;
pub mod link_preview;
pub mod mail;
pub mod messaging;
pub mod notify;
pub mod profile;
pub mod session;
pub mod state;

mod error;

pub use error::{AppError, Result};
pub use state::{App, PollConfig};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for a host binary (respects `RUST_LOG`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ccsba_app=debug,ccsba_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
