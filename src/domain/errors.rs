//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Stable message returned to callers for an empty chat message.
pub const EMPTY_MESSAGE: &str = "Message cannot be empty";

#[derive(Error, Debug)]
pub enum DomainError {
    /// Rejected input. Never reaches the pipeline.
    #[error("{0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Exchange log error: {0}")]
    ExchangeLog(String),

    #[error("Feedback store error: {0}")]
    Feedback(String),

    /// Remote classification failed (transport, status, body or unknown label).
    /// Recovered by the classifier chain; never shown to the user.
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Seed data error: {0}")]
    Seed(String),
}

impl DomainError {
    pub fn empty_message() -> Self {
        DomainError::Validation(EMPTY_MESSAGE.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}
