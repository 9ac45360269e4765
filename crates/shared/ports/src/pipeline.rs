use broker_core::{BrokerDescriptor, PreProcessRecord, TransactionRecord};

/// Port for host notification mechanisms
///
/// Every hook is optional. With nothing overridden, registration hooks are
/// no-ops and pre-process never cancels, so the registry is usable
/// standalone.
pub trait EventPipeline: Send + Sync {
    /// A broker was added to the registry
    fn on_register(&self, _broker: &BrokerDescriptor) {}

    /// A broker was removed from the registry
    fn on_unregister(&self, _broker: &BrokerDescriptor) {}

    /// A transaction is priced and about to commit
    ///
    /// Returns true to cancel it.
    fn on_pre_process(&self, _broker: &BrokerDescriptor, _record: &PreProcessRecord) -> bool {
        false
    }

    /// A transaction committed successfully (fire-and-forget)
    fn on_complete(&self, _broker: &BrokerDescriptor, _record: &TransactionRecord) {}
}

/// Pipeline with nothing wired
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPipeline;

impl EventPipeline for NoopPipeline {}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_core::TransactionRequest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_noop_never_cancels() {
        let descriptor = BrokerDescriptor::new("prices", "TestShop", 0, "item");
        let request = TransactionRequest::buy("item", "sword", 1).unwrap();
        let pending =
            TransactionRecord::start(request).authorize(descriptor.clone(), dec!(5), dec!(5), None);

        let pipeline = NoopPipeline;
        pipeline.on_register(&descriptor);
        assert!(!pipeline.on_pre_process(&descriptor, &pending.view()));
        pipeline.on_complete(&descriptor, &pending.build_success());
        pipeline.on_unregister(&descriptor);
    }
}
