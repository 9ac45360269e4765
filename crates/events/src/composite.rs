//! Fan-out over several pipelines

use broker_core::{BrokerDescriptor, PreProcessRecord, TransactionRecord};
use broker_ports::EventPipeline;
use std::sync::Arc;

/// Forwards every hook to each member, in the order they were added
///
/// Pre-process asks every member, even after one has cancelled, so each
/// observer sees the pending record. The transaction is cancelled if any
/// member cancels.
#[derive(Default, Clone)]
pub struct CompositePipeline {
    members: Vec<Arc<dyn EventPipeline>>,
}

impl CompositePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pipeline: Arc<dyn EventPipeline>) -> Self {
        self.members.push(pipeline);
        self
    }

    pub fn push(&mut self, pipeline: Arc<dyn EventPipeline>) {
        self.members.push(pipeline);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl EventPipeline for CompositePipeline {
    fn on_register(&self, broker: &BrokerDescriptor) {
        for member in &self.members {
            member.on_register(broker);
        }
    }

    fn on_unregister(&self, broker: &BrokerDescriptor) {
        for member in &self.members {
            member.on_unregister(broker);
        }
    }

    fn on_pre_process(&self, broker: &BrokerDescriptor, record: &PreProcessRecord) -> bool {
        self.members
            .iter()
            .fold(false, |cancelled, member| {
                member.on_pre_process(broker, record) || cancelled
            })
    }

    fn on_complete(&self, broker: &BrokerDescriptor, record: &TransactionRecord) {
        for member in &self.members {
            member.on_complete(broker, record);
        }
    }
}

impl std::fmt::Debug for CompositePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositePipeline")
            .field("members", &self.members.len())
            .finish()
    }
}
