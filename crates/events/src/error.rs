//! Error types for the events crate

use thiserror::Error;

/// Event bus errors, as seen by subscribers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event bus closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, EventError>;
