//! Outbound SMTP delivery via lettre's async STARTTLS transport.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl Mailer {
    /// Build the SMTP transport from config.  Without credentials the
    /// mailer runs in dry-run mode: requests are accepted and logged but
    /// nothing goes over the wire.
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let from: Mailbox = format!("\"{}\" <{}>", config.from_name, config.from_addr).parse()?;

        let transport = match (&config.smtp_user, &config.smtp_pass) {
            (Some(user), Some(pass)) => Some(
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                    .port(config.smtp_port)
                    .credentials(Credentials::new(user.clone(), pass.clone()))
                    .build(),
            ),
            _ => {
                warn!("SMTP credentials not configured, running in dry-run mode");
                None
            }
        };

        Ok(Self { transport, from })
    }

    /// Deliver one HTML email.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), RelayError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| RelayError::BadRequest(format!("Invalid recipient: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| RelayError::BadRequest(format!("Invalid message: {e}")))?;

        match &self.transport {
            Some(transport) => {
                transport
                    .send(email)
                    .await
                    .map_err(|e| RelayError::Delivery(e.to_string()))?;
                info!(to = %to, subject, "email delivered");
            }
            None => {
                info!(to = %to, subject, "dry-run: email not sent");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_accepts_valid_recipient() {
        let mailer = Mailer::new(&RelayConfig::default()).unwrap();
        mailer
            .send("jane@x.com", "Welcome to CCSBA", "<p>hi</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected() {
        let mailer = Mailer::new(&RelayConfig::default()).unwrap();
        let err = mailer.send("not-an-address", "s", "c").await.unwrap_err();
        assert!(matches!(err, RelayError::BadRequest(_)));
    }
}
