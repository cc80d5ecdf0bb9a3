//! Error taxonomy for review operations.
//!
//! Every failure an actor can see falls into one of three classes: a
//! client-side precondition that never reached the network, a backend or
//! transport failure, or a missing/expired session.
use thiserror::Error;

/// Review client error.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// A precondition failed before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the request or could not be reached.
    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    /// An authenticated action was attempted without a valid session.
    #[error("{0}")]
    Session(String),

    /// The backend answered with a payload we could not decode.
    #[error("invalid response from {path}: {message}")]
    InvalidResponse { path: String, message: String },
}

impl ReviewError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReviewError::Validation(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        ReviewError::Session(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ReviewError::Validation(_))
    }
}

impl From<ureq::Error> for ReviewError {
    fn from(err: ureq::Error) -> Self {
        ReviewError::Request {
            status: None,
            message: format!("backend unreachable: {err}"),
        }
    }
}

/// Result type for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;
