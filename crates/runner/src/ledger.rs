//! In-memory trade ledger
//!
//! Stands in for the stock and balance systems a real provider would
//! adjust: every committed trade of a [`PriceListBroker`](crate::PriceListBroker)
//! updates running balances and volumes here. Only the most recent trades
//! are kept verbatim.

use broker_core::{ActorId, Amount, BrokerIdentity, Operation, Quantity};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// How many committed trades [`Ledger::recent`] remembers
pub const RECENT_TRADES: usize = 64;

/// One committed trade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub broker: BrokerIdentity,
    pub operation: Operation,
    pub subject: String,
    pub quantity: Quantity,
    pub value: Amount,
    pub actor: Option<ActorId>,
}

#[derive(Debug, Default)]
struct LedgerState {
    trades: usize,
    balances: HashMap<ActorId, Amount>,
    volumes: HashMap<(String, Operation), u64>,
    recent: VecDeque<LedgerEntry>,
}

#[derive(Debug, Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: LedgerEntry) {
        let mut state = self.state.lock();
        state.trades += 1;

        if let Some(actor) = entry.actor {
            let balance = state.balances.entry(actor).or_insert(Decimal::ZERO);
            match entry.operation {
                Operation::Sell => *balance += entry.value,
                Operation::Buy => *balance -= entry.value,
            }
        }

        let volume = state
            .volumes
            .entry((entry.subject.clone(), entry.operation))
            .or_insert(0);
        *volume = volume.saturating_add(u64::from(entry.quantity));

        if state.recent.len() == RECENT_TRADES {
            state.recent.pop_front();
        }
        state.recent.push_back(entry);
    }

    /// Latest trades, oldest first
    pub fn recent(&self) -> Vec<LedgerEntry> {
        self.state.lock().recent.iter().cloned().collect()
    }

    /// Number of trades recorded so far
    pub fn len(&self) -> usize {
        self.state.lock().trades
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Units of a subject moved in one direction
    pub fn volume(&self, subject: &str, operation: Operation) -> u64 {
        self.state
            .lock()
            .volumes
            .get(&(subject.to_string(), operation))
            .copied()
            .unwrap_or(0)
    }

    /// Net balance change for an actor: sales credit, purchases debit
    pub fn balance(&self, actor: ActorId) -> Amount {
        self.state
            .lock()
            .balances
            .get(&actor)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn entry(operation: Operation, quantity: Quantity, value: Amount, actor: ActorId) -> LedgerEntry {
        LedgerEntry {
            broker: BrokerIdentity::new("zShop", "shop", "item"),
            operation,
            subject: "diamond".to_string(),
            quantity,
            value,
            actor: Some(actor),
        }
    }

    #[test]
    fn test_volume_and_balance() {
        let ledger = Ledger::new();
        let steve = Uuid::new_v4();
        let alex = Uuid::new_v4();

        ledger.record(entry(Operation::Buy, 2, dec!(110), steve));
        ledger.record(entry(Operation::Sell, 5, dec!(175), steve));
        ledger.record(entry(Operation::Sell, 1, dec!(35), alex));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.volume("diamond", Operation::Sell), 6);
        assert_eq!(ledger.volume("diamond", Operation::Buy), 2);
        assert_eq!(ledger.volume("dirt", Operation::Buy), 0);
        assert_eq!(ledger.balance(steve), dec!(65));
        assert_eq!(ledger.balance(alex), dec!(35));
        assert_eq!(ledger.balance(Uuid::new_v4()), dec!(0));
    }

    #[test]
    fn test_recent_is_bounded() {
        let ledger = Ledger::new();
        let steve = Uuid::new_v4();
        for quantity in 1..=(RECENT_TRADES as u32 + 10) {
            ledger.record(entry(Operation::Sell, quantity, dec!(1), steve));
        }

        let recent = ledger.recent();
        assert_eq!(recent.len(), RECENT_TRADES);
        assert_eq!(recent[0].quantity, 11);
        assert_eq!(ledger.len(), RECENT_TRADES + 10);
        assert_eq!(ledger.balance(steve), Decimal::from(RECENT_TRADES as u64 + 10));
    }
}
