//! Table-driven broker built from configuration

use broker_core::{
    Amount, BrokerIdentity, CommitAction, Operation, Priority, SubjectType, TransactionRequest,
};
use broker_ports::Broker;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::BrokerConfig;
use crate::ledger::{Ledger, LedgerEntry};

/// Broker answering from fixed buy and sell price lists
///
/// Handles a purchase when the subject is on its buy list and a sale when
/// it is on its sell list. Committed trades are recorded in the shared
/// ledger.
#[derive(Debug)]
pub struct PriceListBroker {
    id: String,
    provider: String,
    subject_type: SubjectType,
    priority: Priority,
    enabled: bool,
    buy: BTreeMap<String, Amount>,
    sell: BTreeMap<String, Amount>,
    display_names: BTreeMap<String, String>,
    ledger: Arc<Ledger>,
}

impl PriceListBroker {
    pub fn from_config(config: &BrokerConfig, ledger: Arc<Ledger>) -> Self {
        Self {
            id: config.id.clone(),
            provider: config.provider.clone(),
            subject_type: config.subject_type.clone(),
            priority: config.priority,
            enabled: config.enabled,
            buy: config.buy.clone(),
            sell: config.sell.clone(),
            display_names: config.display_names.clone(),
            ledger,
        }
    }

    pub fn identity(&self) -> BrokerIdentity {
        BrokerIdentity::new(&self.provider, &self.id, self.subject_type.clone())
    }

    fn price_list(&self, request: &TransactionRequest) -> &BTreeMap<String, Amount> {
        match request.operation() {
            Operation::Buy => &self.buy,
            Operation::Sell => &self.sell,
        }
    }
}

impl Broker for PriceListBroker {
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
        self.enabled
    }

    fn handles(&self, request: &TransactionRequest) -> bool {
        self.price_list(request).contains_key(request.subject())
    }

    fn unit_price(&self, request: &TransactionRequest) -> Option<Amount> {
        self.price_list(request).get(request.subject()).copied()
    }

    fn commit_action(&self, request: &TransactionRequest, value: Amount) -> Option<CommitAction> {
        let ledger = self.ledger.clone();
        let entry = LedgerEntry {
            broker: self.identity(),
            operation: request.operation(),
            subject: request.subject().to_string(),
            quantity: request.quantity(),
            value,
            actor: request.actor(),
        };
        Some(Box::new(move || {
            debug!(
                "Recording {} of {} x{} through {}",
                entry.operation, entry.subject, entry.quantity, entry.broker
            );
            ledger.record(entry);
            Ok(())
        }))
    }

    fn display_name(&self, request: &TransactionRequest) -> Option<String> {
        Some(
            self.display_names
                .get(request.subject())
                .cloned()
                .unwrap_or_else(|| request.subject().to_string()),
        )
    }
}
