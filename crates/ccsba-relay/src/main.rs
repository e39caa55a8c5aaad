//! # ccsba-relay
//!
//! Disconnected mail relay for the CCSBA platform.
//!
//! This binary provides:
//! - **POST /api/send-email** accepting `{to, subject, content}` and
//!   delivering via SMTP submission (STARTTLS)
//! - **GET /health** for liveness checks
//! - **Per-client send throttling** to keep the open endpoint from being abused
//!
//! Without `SMTP_USER`/`SMTP_PASS` in the environment the relay runs in
//! dry-run mode and logs what it would send.

mod api;
mod config;
mod error;
mod mailer;
mod throttle;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::RelayConfig;
use crate::mailer::Mailer;
use crate::throttle::MailThrottle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ccsba_relay=debug")),
        )
        .init();

    info!("Starting CCSBA mail relay v{}", env!("CARGO_PKG_VERSION"));

    let config = RelayConfig::from_env();
    info!(
        addr = %config.http_addr,
        smtp_host = %config.smtp_host,
        dry_run = !config.has_credentials(),
        "Loaded configuration"
    );

    let mailer = Arc::new(Mailer::new(&config)?);
    let throttle = Arc::new(MailThrottle::default());

    let app_state = AppState {
        mailer,
        throttle: throttle.clone(),
        config: Arc::new(config.clone()),
    };

    // Forget elapsed send windows every few minutes
    let sweeper = throttle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            sweeper.sweep();
        }
    });

    let http_addr = config.http_addr;
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
