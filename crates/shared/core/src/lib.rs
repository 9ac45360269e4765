//! Broker Core Domain
//!
//! Pure domain types for the broker registry.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Identity
    BrokerDescriptor,
    BrokerIdentity,
    // Transaction lifecycle
    CommitAction,
    FailureReason,
    Operation,
    Outcome,
    PendingRecord,
    PreProcessRecord,
    RecordBuilder,
    TransactionRecord,
    TransactionRequest,
};
pub use error::{CommitError, RequestError};
pub use values::{
    ActorId, Amount, FALLBACK_PRIORITY, LocationId, Priority, Quantity, SubjectType, Timestamp,
};
