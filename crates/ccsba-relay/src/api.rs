use std::sync::Arc;

use axum::{
    extract::State,
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::mailer::Mailer;
use crate::throttle::{throttle_middleware, MailThrottle};

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<Mailer>,
    pub throttle: Arc<MailThrottle>,
    pub config: Arc<RelayConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/send-email", post(send_email))
        .layer(middleware::from_fn_with_state(
            state.throttle.clone(),
            throttle_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    dry_run: bool,
}

#[derive(Deserialize)]
struct SendEmailRequest {
    to: String,
    subject: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct SendEmailResponse {
    success: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        dry_run: !state.config.has_credentials(),
    })
}

async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, RelayError> {
    state
        .mailer
        .send(&req.to, &req.subject, &req.content)
        .await?;

    info!(to = %req.to, subject = %req.subject, "email request handled");
    Ok(Json(SendEmailResponse { success: true }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting mail relay HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
