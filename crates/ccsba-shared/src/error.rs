use thiserror::Error;

/// Errors a user action can surface.
///
/// Validation failures are resolved at the point of the action and shown
/// inline to the actor; they never corrupt a stored collection.  The login
/// message is deliberately generic so it does not reveal whether the email
/// exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Record not found: {0}")]
    NotFound(String),

    /// Best-effort mail / link-preview delivery failure.  Logged, never
    /// fatal; the primary action always has a fallback path.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}
