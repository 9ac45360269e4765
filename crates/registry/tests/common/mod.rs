//! Scripted brokers shared by the registry integration tests

#![allow(dead_code)]

use broker_core::{
    Amount, BrokerDescriptor, CommitAction, CommitError, PreProcessRecord, Priority, SubjectType,
    TransactionRecord, TransactionRequest,
};
use broker_ports::{Broker, EventPipeline};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// How a scripted broker's commit action behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitBehavior {
    Succeed,
    Reject,
    Panic,
    None,
}

/// Broker method made to panic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerFault {
    Availability,
    Handles,
    UnitPrice,
    CommitAction,
    DisplayName,
}

/// Pipeline hook made to panic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Register,
    Unregister,
    PreProcess,
    Complete,
}

/// Broker whose answers are fixed up front and whose calls are counted
pub struct ScriptedBroker {
    id: String,
    provider: String,
    priority: Priority,
    subject_type: SubjectType,
    subjects: HashSet<String>,
    price: Option<Amount>,
    commit: CommitBehavior,
    available: AtomicBool,
    fault: Option<BrokerFault>,
    pub price_queries: AtomicUsize,
    pub commits: Arc<AtomicUsize>,
}

impl ScriptedBroker {
    pub fn new(id: &str, priority: Priority, subjects: &[&str], price: Option<Amount>) -> Self {
        Self {
            id: id.to_string(),
            provider: "Scripted".to_string(),
            priority,
            subject_type: SubjectType::new("item"),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            price,
            commit: CommitBehavior::Succeed,
            available: AtomicBool::new(true),
            fault: None,
            price_queries: AtomicUsize::new(0),
            commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.provider = provider.to_string();
        self
    }

    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = SubjectType::new(subject_type);
        self
    }

    pub fn commit(mut self, behavior: CommitBehavior) -> Self {
        self.commit = behavior;
        self
    }

    pub fn panicking_in(mut self, fault: BrokerFault) -> Self {
        self.fault = Some(fault);
        self
    }

    fn maybe_panic(&self, fault: BrokerFault) {
        if self.fault == Some(fault) {
            panic!("{:?} exploded in {}", fault, self.id);
        }
    }

    pub fn unavailable(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn price_query_count(&self) -> usize {
        self.price_queries.load(Ordering::SeqCst)
    }
}

impl Broker for ScriptedBroker {
    fn id(&self) -> &str {
        &self.id
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn subject_type(&self) -> &SubjectType {
        &self.subject_type
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn is_available(&self) -> bool {
        self.maybe_panic(BrokerFault::Availability);
        self.available.load(Ordering::SeqCst)
    }

    fn handles(&self, request: &TransactionRequest) -> bool {
        self.maybe_panic(BrokerFault::Handles);
        self.subjects.contains(request.subject())
    }

    fn unit_price(&self, _request: &TransactionRequest) -> Option<Amount> {
        self.price_queries.fetch_add(1, Ordering::SeqCst);
        self.maybe_panic(BrokerFault::UnitPrice);
        self.price
    }

    fn commit_action(&self, _request: &TransactionRequest, _value: Amount) -> Option<CommitAction> {
        self.maybe_panic(BrokerFault::CommitAction);
        let commits = self.commits.clone();
        match self.commit {
            CommitBehavior::None => None,
            CommitBehavior::Succeed => Some(Box::new(move || {
                commits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
            CommitBehavior::Reject => Some(Box::new(move || {
                commits.fetch_add(1, Ordering::SeqCst);
                Err(CommitError::Rejected("out of stock".to_string()))
            })),
            CommitBehavior::Panic => Some(Box::new(move || -> Result<(), CommitError> {
                commits.fetch_add(1, Ordering::SeqCst);
                panic!("stock table corrupted")
            })),
        }
    }

    fn display_name(&self, request: &TransactionRequest) -> Option<String> {
        self.maybe_panic(BrokerFault::DisplayName);
        Some(format!("{} ({})", request.subject(), self.id))
    }
}

/// Pipeline recording every hook call, optionally vetoing pre-process
///
/// A hook set to panic records the call first.
#[derive(Default)]
pub struct RecordingPipeline {
    pub veto: AtomicBool,
    panic_in: Option<Hook>,
    pub registered: Mutex<Vec<BrokerDescriptor>>,
    pub unregistered: Mutex<Vec<BrokerDescriptor>>,
    pub pre_processed: Mutex<Vec<PreProcessRecord>>,
    pub completed: Mutex<Vec<TransactionRecord>>,
}

impl RecordingPipeline {
    pub fn vetoing() -> Self {
        let pipeline = Self::default();
        pipeline.veto.store(true, Ordering::SeqCst);
        pipeline
    }

    pub fn panicking_in(hook: Hook) -> Self {
        Self {
            panic_in: Some(hook),
            ..Self::default()
        }
    }

    fn maybe_panic(&self, hook: Hook) {
        if self.panic_in == Some(hook) {
            panic!("{:?} hook exploded", hook);
        }
    }
}

impl EventPipeline for RecordingPipeline {
    fn on_register(&self, broker: &BrokerDescriptor) {
        self.registered.lock().push(broker.clone());
        self.maybe_panic(Hook::Register);
    }

    fn on_unregister(&self, broker: &BrokerDescriptor) {
        self.unregistered.lock().push(broker.clone());
        self.maybe_panic(Hook::Unregister);
    }

    fn on_pre_process(&self, _broker: &BrokerDescriptor, record: &PreProcessRecord) -> bool {
        self.pre_processed.lock().push(record.clone());
        self.maybe_panic(Hook::PreProcess);
        self.veto.load(Ordering::SeqCst)
    }

    fn on_complete(&self, _broker: &BrokerDescriptor, record: &TransactionRecord) {
        self.completed.lock().push(record.clone());
        self.maybe_panic(Hook::Complete);
    }
}
