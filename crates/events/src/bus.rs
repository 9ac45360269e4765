//! Broadcast event bus
//!
//! Lifecycle and completion events go out over a tokio `broadcast` channel,
//! so any number of async observers can follow the registry without being
//! on the dispatch path. Pre-process stays synchronous: vetoes are plain
//! closures evaluated on the dispatching thread.

use broker_core::{BrokerDescriptor, PreProcessRecord, TransactionRecord};
use broker_ports::EventPipeline;
use log::{debug, trace, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::{EventError, Result};

/// Channel capacity used by [`EventBus::default`]
pub const DEFAULT_BUS_CAPACITY: usize = 1000;

type Veto = Arc<dyn Fn(&BrokerDescriptor, &PreProcessRecord) -> bool + Send + Sync>;

/// Event published on the bus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrokerEvent {
    Registered { broker: BrokerDescriptor },
    Unregistered { broker: BrokerDescriptor },
    Completed {
        broker: BrokerDescriptor,
        record: TransactionRecord,
    },
}

impl BrokerEvent {
    pub fn broker(&self) -> &BrokerDescriptor {
        match self {
            BrokerEvent::Registered { broker }
            | BrokerEvent::Unregistered { broker }
            | BrokerEvent::Completed { broker, .. } => broker,
        }
    }
}

/// Event pipeline backed by a broadcast channel
pub struct EventBus {
    tx: broadcast::Sender<BrokerEvent>,
    vetoes: RwLock<Vec<Veto>>,
}

impl EventBus {
    /// Create a bus whose subscribers may fall `capacity` events behind
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            vetoes: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Add a synchronous pre-process veto; returning true cancels
    pub fn add_veto<F>(&self, veto: F)
    where
        F: Fn(&BrokerDescriptor, &PreProcessRecord) -> bool + Send + Sync + 'static,
    {
        self.vetoes.write().push(Arc::new(veto));
    }

    /// Publish an event, returning how many subscribers will see it
    ///
    /// Nobody listening is not an error; the event is dropped.
    pub fn publish(&self, event: BrokerEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                trace!("No subscribers for event on {}", event.broker());
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl EventPipeline for EventBus {
    fn on_register(&self, broker: &BrokerDescriptor) {
        self.publish(BrokerEvent::Registered {
            broker: broker.clone(),
        });
    }

    fn on_unregister(&self, broker: &BrokerDescriptor) {
        self.publish(BrokerEvent::Unregistered {
            broker: broker.clone(),
        });
    }

    fn on_pre_process(&self, broker: &BrokerDescriptor, record: &PreProcessRecord) -> bool {
        // Evaluated off the lock so a veto may add vetoes
        let vetoes: Vec<Veto> = self.vetoes.read().iter().cloned().collect();
        let cancelled = vetoes
            .iter()
            .fold(false, |cancelled, veto| veto(broker, record) || cancelled);
        if cancelled {
            debug!("Transaction through {} vetoed on the event bus", broker);
        }
        cancelled
    }

    fn on_complete(&self, broker: &BrokerDescriptor, record: &TransactionRecord) {
        self.publish(BrokerEvent::Completed {
            broker: broker.clone(),
            record: record.clone(),
        });
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.tx.receiver_count())
            .field("vetoes", &self.vetoes.read().len())
            .finish()
    }
}

/// Receiving side of an [`EventBus`]
///
/// A subscriber that falls behind skips the events it missed.
pub struct EventSubscriber {
    rx: broadcast::Receiver<BrokerEvent>,
}

impl EventSubscriber {
    /// Wait for the next event
    pub async fn next(&mut self) -> Result<BrokerEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return Err(EventError::Closed),
            }
        }
    }

    /// Take the next event if one is waiting
    pub fn try_next(&mut self) -> Result<Option<BrokerEvent>> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Ok(Some(event)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::TryRecvError::Closed) => return Err(EventError::Closed),
            }
        }
    }
}
