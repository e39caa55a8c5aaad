//! Client for the disconnected mail relay.
//!
//! Delivery is fire-and-forget: a failed or unreachable relay is logged
//! and never blocks the calling flow.

use serde::Serialize;
use tracing::{debug, warn};

use ccsba_shared::DomainError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone)]
pub struct MailClient {
    http: reqwest::Client,
    relay_url: String,
}

impl MailClient {
    /// `relay_url` is the relay's base URL, e.g. `http://localhost:3001`.
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_url: relay_url.into(),
        }
    }

    /// Post one email to the relay.  Errors are swallowed after logging.
    pub async fn send(&self, to: &str, subject: &str, content: &str) {
        if let Err(err) = self.try_send(to, subject, content).await {
            warn!(to, subject, %err, "email dropped");
        }
    }

    async fn try_send(&self, to: &str, subject: &str, content: &str) -> Result<(), DomainError> {
        let url = format!("{}/api/send-email", self.relay_url);
        let body = SendEmailRequest { to, subject, content };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Delivery(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DomainError::Delivery(format!(
                "relay returned {}",
                resp.status()
            )));
        }

        debug!(to, subject, "email handed to relay");
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str, origin: &str, token: &str) {
        self.send(email, "Password Reset Request", &password_reset_body(origin, token))
            .await;
    }

    pub async fn send_welcome(&self, email: &str, temporary_password: &str) {
        self.send(email, "Welcome to CCSBA", &welcome_body(email, temporary_password))
            .await;
    }
}

pub fn password_reset_body(origin: &str, token: &str) -> String {
    let reset_link = format!("{origin}/reset-password?token={token}");
    format!(
        "<h1>Password Reset Request</h1>\n\
         <p>Click the link below to reset your password:</p>\n\
         <a href=\"{reset_link}\">{reset_link}</a>\n\
         <p>If you didn't request this, please ignore this email.</p>"
    )
}

pub fn welcome_body(email: &str, temporary_password: &str) -> String {
    format!(
        "<h1>Welcome to CCSBA!</h1>\n\
         <p>Your account has been created with the following credentials:</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Temporary Password:</strong> {temporary_password}</p>\n\
         <p>Please log in and change your password immediately.</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_body_embeds_full_link() {
        let body = password_reset_body("https://ccsba.example", "tok-123");
        assert!(body.contains("https://ccsba.example/reset-password?token=tok-123"));
        assert!(body.contains("Password Reset Request"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_swallowed() {
        let client = MailClient::new("http://127.0.0.1:1");
        client.send("jane@x.com", "Welcome to CCSBA", "<p>hi</p>").await;
    }

    #[test]
    fn welcome_body_carries_credentials() {
        let body = welcome_body("jane@x.com", "CBD");
        assert!(body.contains("jane@x.com"));
        assert!(body.contains("Temporary Password:</strong> CBD"));
        assert!(body.contains("change your password immediately"));
    }
}
