use thiserror::Error;

/// Errors raised while building a transaction request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,

    #[error("Subject reference must not be empty")]
    EmptySubject,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// Failure reported by a broker's commit action
///
/// Either variant ends the transaction as an internal fault; the record
/// carries the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("Commit rejected: {0}")]
    Rejected(String),

    #[error("Commit failed: {0}")]
    Internal(String),
}
