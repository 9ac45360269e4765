use serde::Serialize;

use super::Operation;
use crate::error::RequestError;
use crate::values::{ActorId, LocationId, Quantity, SubjectType};

/// A request to buy or sell some quantity of a subject
///
/// Fields are private so that a request always holds a positive quantity
/// and a non-empty subject reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    subject_type: SubjectType,
    /// Which subject of that type, e.g. `"sword"`
    subject: String,
    actor: Option<ActorId>,
    location: Option<LocationId>,
    quantity: Quantity,
    operation: Operation,
}

impl TransactionRequest {
    /// Create a new request without actor or location
    pub fn new(
        operation: Operation,
        subject_type: impl Into<SubjectType>,
        subject: impl Into<String>,
        quantity: Quantity,
    ) -> Result<Self, RequestError> {
        let subject = subject.into();
        if quantity == 0 {
            return Err(RequestError::InvalidQuantity);
        }
        if subject.trim().is_empty() {
            return Err(RequestError::EmptySubject);
        }
        Ok(Self {
            subject_type: subject_type.into(),
            subject,
            actor: None,
            location: None,
            quantity,
            operation,
        })
    }

    /// Create a purchase request
    pub fn buy(
        subject_type: impl Into<SubjectType>,
        subject: impl Into<String>,
        quantity: Quantity,
    ) -> Result<Self, RequestError> {
        Self::new(Operation::Buy, subject_type, subject, quantity)
    }

    /// Create a sale request
    pub fn sell(
        subject_type: impl Into<SubjectType>,
        subject: impl Into<String>,
        quantity: Quantity,
    ) -> Result<Self, RequestError> {
        Self::new(Operation::Sell, subject_type, subject, quantity)
    }

    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_location(mut self, location: LocationId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn subject_type(&self) -> &SubjectType {
        &self.subject_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn location(&self) -> Option<LocationId> {
        self.location
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}
