//! Closure-per-hook pipeline

use broker_core::{BrokerDescriptor, PreProcessRecord, TransactionRecord};
use broker_ports::EventPipeline;

type DescriptorHook = Box<dyn Fn(&BrokerDescriptor) + Send + Sync>;
type PreProcessHook = Box<dyn Fn(&BrokerDescriptor, &PreProcessRecord) -> bool + Send + Sync>;
type CompleteHook = Box<dyn Fn(&BrokerDescriptor, &TransactionRecord) + Send + Sync>;

/// Pipeline built from optional closures
///
/// Hooks left unset behave like [`NoopPipeline`](broker_ports::NoopPipeline).
///
/// ```
/// use broker_events::EventHandlers;
///
/// let handlers = EventHandlers::new()
///     .with_pre_process(|_, record| record.request().quantity() > 64);
/// ```
#[derive(Default)]
pub struct EventHandlers {
    on_register: Option<DescriptorHook>,
    on_unregister: Option<DescriptorHook>,
    on_pre_process: Option<PreProcessHook>,
    on_complete: Option<CompleteHook>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BrokerDescriptor) + Send + Sync + 'static,
    {
        self.on_register = Some(Box::new(hook));
        self
    }

    pub fn with_unregister<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BrokerDescriptor) + Send + Sync + 'static,
    {
        self.on_unregister = Some(Box::new(hook));
        self
    }

    /// Hook returning true cancels the transaction
    pub fn with_pre_process<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BrokerDescriptor, &PreProcessRecord) -> bool + Send + Sync + 'static,
    {
        self.on_pre_process = Some(Box::new(hook));
        self
    }

    pub fn with_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BrokerDescriptor, &TransactionRecord) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(hook));
        self
    }
}

impl EventPipeline for EventHandlers {
    fn on_register(&self, broker: &BrokerDescriptor) {
        if let Some(hook) = &self.on_register {
            hook(broker);
        }
    }

    fn on_unregister(&self, broker: &BrokerDescriptor) {
        if let Some(hook) = &self.on_unregister {
            hook(broker);
        }
    }

    fn on_pre_process(&self, broker: &BrokerDescriptor, record: &PreProcessRecord) -> bool {
        self.on_pre_process
            .as_ref()
            .is_some_and(|hook| hook(broker, record))
    }

    fn on_complete(&self, broker: &BrokerDescriptor, record: &TransactionRecord) {
        if let Some(hook) = &self.on_complete {
            hook(broker, record);
        }
    }
}

impl std::fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandlers")
            .field("on_register", &self.on_register.is_some())
            .field("on_unregister", &self.on_unregister.is_some())
            .field("on_pre_process", &self.on_pre_process.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_core::TransactionRequest;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor() -> BrokerDescriptor {
        BrokerDescriptor::new("shop", "Village", 10, "item")
    }

    #[test]
    fn test_unset_hooks_never_cancel() {
        let handlers = EventHandlers::new();
        let view = TransactionRecord::start(TransactionRequest::buy("item", "sword", 1).unwrap())
            .authorize(descriptor(), dec!(5), dec!(5), None)
            .view();

        handlers.on_register(&descriptor());
        assert!(!handlers.on_pre_process(&descriptor(), &view));
    }

    #[test]
    fn test_hooks_are_called() {
        let registered = Arc::new(AtomicUsize::new(0));
        let counter = registered.clone();
        let handlers = EventHandlers::new()
            .with_register(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_pre_process(|_, record| record.value() > dec!(100));

        handlers.on_register(&descriptor());
        handlers.on_unregister(&descriptor());
        assert_eq!(registered.load(Ordering::SeqCst), 1);

        let request = TransactionRequest::buy("item", "sword", 30).unwrap();
        let cheap = TransactionRecord::start(request.clone())
            .authorize(descriptor(), dec!(3), dec!(90), None)
            .view();
        let dear = TransactionRecord::start(request)
            .authorize(descriptor(), dec!(5), dec!(150), None)
            .view();
        assert!(!handlers.on_pre_process(&descriptor(), &cheap));
        assert!(handlers.on_pre_process(&descriptor(), &dear));
    }
}
