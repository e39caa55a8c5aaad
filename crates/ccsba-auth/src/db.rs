//! User table access.
//!
//! One row per registered account.  Verification and reset tokens are
//! single-use: consumed (nulled) by the flow that redeems them.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::password::{hash_password, verify_password};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id                 TEXT PRIMARY KEY,
    email              TEXT NOT NULL UNIQUE,
    password_hash      TEXT NOT NULL,
    is_verified        INTEGER NOT NULL DEFAULT 0,
    verification_token TEXT,
    reset_token        TEXT,
    reset_expires      TEXT
)";

const RESET_TTL_HOURS: i64 = 1;

/// A registered account row.  `password_hash` stays internal to the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_verified: bool,
}

/// Wrapper around a [`rusqlite::Connection`] holding the users table.
pub struct AuthDb {
    conn: Mutex<Connection>,
}

impl AuthDb {
    /// Open (or create) the default auth database in the platform data
    /// directory.
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("org", "ctcannabisalliance", "ccsba")
            .ok_or(AuthError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("auth.db");
        tracing::info!(path = %db_path.display(), "opening auth database");
        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new account.  Returns the user and the one-time email
    /// verification token.
    pub fn create_user(&self, email: &str, password: &str) -> Result<(User, String)> {
        let hash = hash_password(password)?;
        let id = Uuid::new_v4().to_string();
        let verification_token = Uuid::new_v4().to_string();

        let conn = self.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, email, password_hash, verification_token)
             VALUES (?1, ?2, ?3, ?4)",
            (&id, email, &hash, &verification_token),
        )?;
        if inserted == 0 {
            return Err(AuthError::UserExists);
        }

        tracing::info!(email, "registered user");
        Ok((
            User {
                id,
                email: email.to_string(),
                is_verified: false,
            },
            verification_token,
        ))
    }

    /// Redeem an email verification token, marking the account verified.
    pub fn verify_user(&self, token: &str) -> Result<User> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, email, is_verified FROM users WHERE verification_token = ?1",
                [token],
                row_to_user,
            )
            .optional()?
            .ok_or(AuthError::InvalidVerificationToken)?;

        conn.execute(
            "UPDATE users SET is_verified = 1, verification_token = NULL WHERE id = ?1",
            [&user.id],
        )?;

        Ok(User {
            is_verified: true,
            ..user
        })
    }

    /// Issue a reset token with a one-hour expiry.
    pub fn initiate_password_reset(&self, email: &str) -> Result<String> {
        let reset_token = Uuid::new_v4().to_string();
        let expires = (Utc::now() + Duration::hours(RESET_TTL_HOURS)).to_rfc3339();

        let conn = self.lock();
        let updated = conn.execute(
            "UPDATE users SET reset_token = ?1, reset_expires = ?2 WHERE email = ?3",
            (&reset_token, &expires, email),
        )?;
        if updated == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(reset_token)
    }

    /// Redeem a reset token and set a new password.  Expired or unknown
    /// tokens fail identically.
    pub fn reset_password(&self, token: &str, new_password: &str) -> Result<User> {
        let conn = self.lock();
        let (user, expires): (User, Option<String>) = conn
            .query_row(
                "SELECT id, email, is_verified, reset_expires
                 FROM users WHERE reset_token = ?1",
                [token],
                |row| Ok((row_to_user(row)?, row.get(3)?)),
            )
            .optional()?
            .ok_or(AuthError::InvalidResetToken)?;

        let still_valid = expires
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|t| t > Utc::now());
        if !still_valid {
            return Err(AuthError::InvalidResetToken);
        }

        let hash = hash_password(new_password)?;
        conn.execute(
            "UPDATE users
             SET password_hash = ?1, reset_token = NULL, reset_expires = NULL
             WHERE id = ?2",
            (&hash, &user.id),
        )?;

        tracing::info!(email = %user.email, "password reset");
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.lock();
        Ok(conn
            .query_row(
                "SELECT id, email, is_verified FROM users WHERE email = ?1",
                [email],
                row_to_user,
            )
            .optional()?)
    }

    /// Check a login attempt against the stored hash.  Unknown emails and
    /// wrong passwords fail identically.
    pub fn verify_login(&self, email: &str, password: &str) -> Result<User> {
        let conn = self.lock();
        let (user, hash): (User, String) = conn
            .query_row(
                "SELECT id, email, is_verified, password_hash
                 FROM users WHERE email = ?1",
                [email],
                |row| Ok((row_to_user(row)?, row.get(3)?)),
            )
            .optional()?
            .ok_or(AuthError::InvalidCredentials)?;
        drop(conn);

        if !verify_password(password, &hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        is_verified: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_verify_login_flow() {
        let db = AuthDb::in_memory().unwrap();
        let (user, token) = db.create_user("jane@x.com", "hunter2").unwrap();
        assert!(!user.is_verified);

        let verified = db.verify_user(&token).unwrap();
        assert!(verified.is_verified);
        // token is single-use
        assert!(matches!(
            db.verify_user(&token).unwrap_err(),
            AuthError::InvalidVerificationToken
        ));

        assert_eq!(db.verify_login("jane@x.com", "hunter2").unwrap().id, user.id);
        assert!(matches!(
            db.verify_login("jane@x.com", "wrong").unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            db.verify_login("nobody@x.com", "hunter2").unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = AuthDb::in_memory().unwrap();
        db.create_user("jane@x.com", "pw").unwrap();
        assert!(matches!(
            db.create_user("jane@x.com", "pw2").unwrap_err(),
            AuthError::UserExists
        ));
    }

    #[test]
    fn reset_flow_replaces_password() {
        let db = AuthDb::in_memory().unwrap();
        db.create_user("jane@x.com", "old-pw").unwrap();

        let token = db.initiate_password_reset("jane@x.com").unwrap();
        db.reset_password(&token, "new-pw").unwrap();

        assert!(db.verify_login("jane@x.com", "new-pw").is_ok());
        assert!(db.verify_login("jane@x.com", "old-pw").is_err());
        // token is single-use
        assert!(matches!(
            db.reset_password(&token, "again").unwrap_err(),
            AuthError::InvalidResetToken
        ));
    }

    #[test]
    fn expired_reset_token_is_rejected() {
        let db = AuthDb::in_memory().unwrap();
        db.create_user("jane@x.com", "pw").unwrap();
        let token = db.initiate_password_reset("jane@x.com").unwrap();

        // force the expiry into the past
        {
            let conn = db.lock();
            conn.execute(
                "UPDATE users SET reset_expires = ?1",
                [(Utc::now() - Duration::hours(2)).to_rfc3339()],
            )
            .unwrap();
        }

        assert!(matches!(
            db.reset_password(&token, "new").unwrap_err(),
            AuthError::InvalidResetToken
        ));
    }

    #[test]
    fn reset_for_unknown_email_fails() {
        let db = AuthDb::in_memory().unwrap();
        assert!(matches!(
            db.initiate_password_reset("nobody@x.com").unwrap_err(),
            AuthError::UserNotFound
        ));
    }

    #[test]
    fn open_at_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.db");

        {
            let db = AuthDb::open_at(&path).unwrap();
            db.create_user("jane@x.com", "pw").unwrap();
        }

        let db = AuthDb::open_at(&path).unwrap();
        assert!(db.find_by_email("jane@x.com").unwrap().is_some());
    }
}
