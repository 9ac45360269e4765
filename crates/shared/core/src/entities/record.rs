//! Transaction records and the builder state machine that produces them
//!
//! ```text
//! RecordBuilder ──authorize()──► PendingRecord ──build_success()──► TransactionRecord (Success)
//!       │                              │
//!       └──build_failure()             └──build_failure()──────────► TransactionRecord (Failure)
//! ```
//!
//! Every finalizer consumes its builder, so a record can only be finalized
//! once and a finished record is never touched again.

use chrono::Utc;
use serde::Serialize;

use super::{BrokerDescriptor, FailureReason, Outcome, TransactionRequest};
use crate::error::CommitError;
use crate::values::{Amount, Timestamp};

/// Deferred side effect of a transaction (stock or balance adjustment, ...)
///
/// Runs at most once, and only after every pre-process hook let the
/// transaction through.
pub type CommitAction = Box<dyn FnOnce() -> Result<(), CommitError> + Send + 'static>;

/// Finished transaction, owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    request: TransactionRequest,
    /// Broker that claimed the request, if any did
    broker: Option<BrokerDescriptor>,
    /// Price per unit as quoted by the broker; absent on failure
    unit_price: Option<Amount>,
    /// Unit price times quantity; absent on failure
    value: Option<Amount>,
    display_name: Option<String>,
    outcome: Outcome,
    completed_at: Timestamp,
}

impl TransactionRecord {
    /// Start building the record for a request
    pub fn start(request: TransactionRequest) -> RecordBuilder {
        RecordBuilder {
            request,
            broker: None,
            display_name: None,
        }
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn broker(&self) -> Option<&BrokerDescriptor> {
        self.broker.as_ref()
    }

    pub fn value(&self) -> Option<Amount> {
        self.value
    }

    pub fn unit_price(&self) -> Option<Amount> {
        self.unit_price
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        self.outcome.failure_reason()
    }

    pub fn completed_at(&self) -> Timestamp {
        self.completed_at
    }
}

/// Building state: request known, no value yet
#[derive(Debug)]
pub struct RecordBuilder {
    request: TransactionRequest,
    broker: Option<BrokerDescriptor>,
    display_name: Option<String>,
}

impl RecordBuilder {
    /// Record the broker that claimed the request
    pub fn with_broker(mut self, broker: BrokerDescriptor) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    /// Price the transaction and authorize its commit action
    ///
    /// The action is stored, not run; running it is up to the dispatcher.
    pub fn authorize(
        self,
        broker: BrokerDescriptor,
        unit_price: Amount,
        value: Amount,
        commit: Option<CommitAction>,
    ) -> PendingRecord {
        PendingRecord {
            request: self.request,
            broker,
            unit_price,
            value,
            display_name: self.display_name,
            commit,
        }
    }

    /// Finalize as a failure. The value is left absent.
    pub fn build_failure(self, reason: FailureReason) -> TransactionRecord {
        TransactionRecord {
            request: self.request,
            broker: self.broker,
            unit_price: None,
            value: None,
            display_name: self.display_name,
            outcome: Outcome::Failure(reason),
            completed_at: Utc::now(),
        }
    }
}

/// Pending state: priced, commit authorized but not yet run
pub struct PendingRecord {
    request: TransactionRequest,
    broker: BrokerDescriptor,
    unit_price: Amount,
    value: Amount,
    display_name: Option<String>,
    commit: Option<CommitAction>,
}

impl PendingRecord {
    /// Reduced view handed to pre-process hooks
    pub fn view(&self) -> PreProcessRecord {
        PreProcessRecord {
            request: self.request.clone(),
            broker: self.broker.clone(),
            unit_price: self.unit_price,
            value: self.value,
            display_name: self.display_name.clone(),
            has_commit_action: self.commit.is_some(),
        }
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn broker(&self) -> &BrokerDescriptor {
        &self.broker
    }

    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn has_commit_action(&self) -> bool {
        self.commit.is_some()
    }

    /// Hand out the authorized commit action. Yields it at most once.
    pub fn take_commit_action(&mut self) -> Option<CommitAction> {
        self.commit.take()
    }

    /// Finalize as a success.
    ///
    /// An action that was never taken is dropped without running.
    pub fn build_success(self) -> TransactionRecord {
        TransactionRecord {
            request: self.request,
            broker: Some(self.broker),
            unit_price: Some(self.unit_price),
            value: Some(self.value),
            display_name: self.display_name,
            outcome: Outcome::Success,
            completed_at: Utc::now(),
        }
    }

    /// Finalize as a failure, discarding the commit action and the value
    pub fn build_failure(self, reason: FailureReason) -> TransactionRecord {
        TransactionRecord {
            request: self.request,
            broker: Some(self.broker),
            unit_price: None,
            value: None,
            display_name: self.display_name,
            outcome: Outcome::Failure(reason),
            completed_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for PendingRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRecord")
            .field("request", &self.request)
            .field("broker", &self.broker)
            .field("unit_price", &self.unit_price)
            .field("value", &self.value)
            .field("display_name", &self.display_name)
            .field("has_commit_action", &self.commit.is_some())
            .finish()
    }
}

/// Pre-commit view of a pending transaction, exposed to cancellation hooks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreProcessRecord {
    request: TransactionRequest,
    broker: BrokerDescriptor,
    unit_price: Amount,
    value: Amount,
    display_name: Option<String>,
    has_commit_action: bool,
}

impl PreProcessRecord {
    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn broker(&self) -> &BrokerDescriptor {
        &self.broker
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Whether approving this transaction runs a side effect
    pub fn has_commit_action(&self) -> bool {
        self.has_commit_action
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::Pending
    }
}
