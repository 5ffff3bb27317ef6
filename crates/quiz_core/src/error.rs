//! Quiz core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    /// Exam code or session missing. Expired records read as `NotFound`.
    #[error("Record not found")]
    NotFound,

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
