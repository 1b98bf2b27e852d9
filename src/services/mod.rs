//! Service layer orchestrating validation, filtering, pagination and storage.

use thiserror::Error;

use crate::filters::FilterError;
use crate::validation::ValidationError;

pub mod results;

/// Outcome kinds surfaced to the transport layer.
///
/// Input errors carry their reason for the caller. Storage failures are logged
/// where they happen and reach the caller only as [`ServiceError::Internal`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid query: {0}")]
    Filter(#[from] FilterError),

    #[error("test run not found")]
    NotFound,

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
