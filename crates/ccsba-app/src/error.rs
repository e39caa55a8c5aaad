use thiserror::Error;

use ccsba_shared::DomainError;
use ccsba_store::StoreError;

/// Application-level error: a user-facing domain failure or an underlying
/// storage failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        // Domain-shaped store failures surface as their user-facing form.
        match err {
            StoreError::DuplicateEmail => AppError::Domain(DomainError::DuplicateEmail),
            StoreError::NotFound(what) => AppError::Domain(DomainError::NotFound(what)),
            other => AppError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
