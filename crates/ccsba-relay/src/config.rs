//! Relay configuration loaded from environment variables.
//!
//! All settings have defaults so the relay can start with zero
//! configuration for local development; without SMTP credentials it runs
//! in dry-run mode and only logs what it would send.

use std::net::SocketAddr;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address for the HTTP (axum) server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:3001`
    pub http_addr: SocketAddr,

    /// SMTP hostname.
    /// Env: `SMTP_HOST`
    /// Default: `smtp.office365.com`
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS).
    /// Env: `SMTP_PORT`
    /// Default: `587`
    pub smtp_port: u16,

    /// SMTP username.  When absent the relay runs in dry-run mode.
    /// Env: `SMTP_USER`
    pub smtp_user: Option<String>,

    /// SMTP password.
    /// Env: `SMTP_PASS`
    pub smtp_pass: Option<String>,

    /// Display name on outbound mail.
    /// Env: `FROM_NAME`
    /// Default: `CCSBA Platform`
    pub from_name: String,

    /// Envelope sender address.
    /// Env: `FROM_ADDR`
    /// Default: `info@ctcannabisalliance.org`
    pub from_addr: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 3001).into(),
            smtp_host: "smtp.office365.com".to_string(),
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            from_name: "CCSBA Platform".to_string(),
            from_addr: "info@ctcannabisalliance.org".to_string(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(host) = std::env::var("SMTP_HOST") {
            config.smtp_host = host;
        }

        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                config.smtp_port = parsed;
            } else {
                tracing::warn!(value = %port, "Invalid SMTP_PORT, using default");
            }
        }

        if let Ok(user) = std::env::var("SMTP_USER") {
            if !user.is_empty() {
                config.smtp_user = Some(user);
            }
        }

        if let Ok(pass) = std::env::var("SMTP_PASS") {
            if !pass.is_empty() {
                config.smtp_pass = Some(pass);
            }
        }

        if let Ok(name) = std::env::var("FROM_NAME") {
            config.from_name = name;
        }

        if let Ok(addr) = std::env::var("FROM_ADDR") {
            config.from_addr = addr;
        }

        config
    }

    /// Whether SMTP credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.smtp_user.is_some() && self.smtp_pass.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 3001).into());
        assert_eq!(config.smtp_port, 587);
        assert!(!config.has_credentials());
    }
}
