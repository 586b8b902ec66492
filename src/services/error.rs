use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::services::generator::GenerationError;

/// Failure kinds of the request operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    WriteFailed(String),

    #[error("{0}")]
    GenerationFailed(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            StoreError::Unavailable(msg) | StoreError::InvalidQuery(msg) => {
                ServiceError::StoreUnavailable(msg)
            }
            StoreError::WriteFailed(msg) => ServiceError::WriteFailed(msg),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Unauthenticated(err.to_string())
    }
}

impl From<GenerationError> for ServiceError {
    fn from(err: GenerationError) -> Self {
        ServiceError::GenerationFailed(err.to_string())
    }
}
