use crate::store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

/// Coarse error category handed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Conflict,
    Internal,
}

impl OrchestratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestratorError::NotFound(_) => ErrorKind::NotFound,
            OrchestratorError::InvalidInput(_) => ErrorKind::BadRequest,
            OrchestratorError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            OrchestratorError::Store(StoreError::Invalid(_)) => ErrorKind::BadRequest,
            OrchestratorError::Store(StoreError::Conflict(_)) => ErrorKind::Conflict,
            OrchestratorError::Store(StoreError::Unexpected(_)) => ErrorKind::Internal,
            OrchestratorError::Internal(_) => ErrorKind::Internal,
        }
    }
}
