//! JWT session tokens (HS256, 24-hour expiry).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

const TOKEN_TTL_HOURS: i64 = 24;

/// Signing secret from `JWT_SECRET`, with a fixed development fallback.
pub fn secret_from_env() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "your-secret-key".to_string())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's email.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

pub fn generate_token(email: &str, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: email.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Decode and validate a token, returning the subject email.
pub fn verify_token(token: &str, secret: &str) -> Result<String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let token = generate_token("jane@x.com", "test-secret").unwrap();
        assert_eq!(verify_token(&token, "test-secret").unwrap(), "jane@x.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token("jane@x.com", "test-secret").unwrap();
        assert!(matches!(
            verify_token(&token, "other-secret").unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not.a.jwt", "test-secret").is_err());
    }
}
