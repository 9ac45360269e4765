use broker_core::{BrokerDescriptor, BrokerIdentity, Priority};
use broker_ports::Broker;
use log::warn;
use std::cmp::Reverse;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatch::guarded;

/// A broker as held by the registry: descriptor, capabilities, position
///
/// Position is `(priority descending, sequence ascending)`. The sequence is
/// handed out by the registry at insertion and only ever grows, which makes
/// ordering among equal priorities follow registration order.
pub struct RegisteredBroker {
    descriptor: BrokerDescriptor,
    broker: Arc<dyn Broker>,
    sequence: u64,
    /// Cached result of the broker's availability predicate
    available: AtomicBool,
}

impl RegisteredBroker {
    pub(crate) fn new(broker: Arc<dyn Broker>, descriptor: BrokerDescriptor, sequence: u64) -> Self {
        let available = probe_availability(broker.as_ref(), &descriptor);
        Self {
            descriptor,
            broker,
            sequence,
            available: AtomicBool::new(available),
        }
    }

    pub fn descriptor(&self) -> &BrokerDescriptor {
        &self.descriptor
    }

    pub fn identity(&self) -> BrokerIdentity {
        self.descriptor.identity()
    }

    pub fn broker(&self) -> &Arc<dyn Broker> {
        &self.broker
    }

    pub fn priority(&self) -> Priority {
        self.descriptor.priority
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Cached availability, as of registration or the last refresh
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Re-evaluate the availability predicate and cache the result
    pub fn refresh_availability(&self) -> bool {
        let available = probe_availability(self.broker.as_ref(), &self.descriptor);
        self.available.store(available, Ordering::Release);
        available
    }

    /// Sort key: higher priority first, then earlier registration first
    pub(crate) fn position(&self) -> (Reverse<Priority>, u64) {
        (Reverse(self.descriptor.priority), self.sequence)
    }
}

impl std::fmt::Debug for RegisteredBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredBroker")
            .field("descriptor", &self.descriptor)
            .field("sequence", &self.sequence)
            .field("available", &self.is_available())
            .finish()
    }
}

/// A panicking availability check counts as unavailable
fn probe_availability(broker: &dyn Broker, descriptor: &BrokerDescriptor) -> bool {
    match guarded(|| broker.is_available()) {
        Ok(available) => available,
        Err(fault) => {
            warn!("Availability check of {} faulted: {}", descriptor, fault);
            false
        }
    }
}
