use broker_core::{
    Amount, BrokerDescriptor, CommitAction, FALLBACK_PRIORITY, Priority, SubjectType,
    TransactionRequest,
};

/// Port for economy implementations able to price and execute transactions
///
/// One broker serves one subject type on behalf of one provider. The same
/// contract covers purchases and sales; implementations branch on
/// [`TransactionRequest::operation`].
///
/// Calls are synchronous and expected to be fast: no I/O on the dispatch path.
pub trait Broker: Send + Sync {
    /// Self-reported identifier, unique per provider and subject type
    fn id(&self) -> &str;

    /// Name of the system supplying this implementation
    fn provider(&self) -> &str;

    /// The kind of subject this broker trades
    fn subject_type(&self) -> &SubjectType;

    /// Position among brokers of the same subject type. Higher is consulted first.
    fn priority(&self) -> Priority {
        FALLBACK_PRIORITY
    }

    /// Whether the backing implementation is usable at all
    ///
    /// Evaluated at registration and cached by the registry; re-checked only
    /// when the registry is asked to refresh availability.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether this broker claims the request (operation, subject, actor, location)
    fn handles(&self, request: &TransactionRequest) -> bool;

    /// Price of one unit for this request
    ///
    /// `None` or a non-positive amount means the subject is not priceable.
    fn unit_price(&self, request: &TransactionRequest) -> Option<Amount>;

    /// Side effect to run once the transaction is approved
    ///
    /// `value` is the total value of the transaction. Read-only brokers
    /// return `None`.
    fn commit_action(&self, _request: &TransactionRequest, _value: Amount) -> Option<CommitAction> {
        None
    }

    /// Human readable name of the subject, if the broker knows one
    fn display_name(&self, _request: &TransactionRequest) -> Option<String> {
        None
    }

    /// Descriptor captured by the registry at registration
    fn descriptor(&self) -> BrokerDescriptor {
        BrokerDescriptor::new(
            self.id(),
            self.provider(),
            self.priority(),
            self.subject_type().clone(),
        )
    }
}
