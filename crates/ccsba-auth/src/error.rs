use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No platform data directory available")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Invalid token")]
    InvalidToken,
}

pub type Result<T> = std::result::Result<T, AuthError>;
