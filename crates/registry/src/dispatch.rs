//! Winner-take-all transaction dispatch
//!
//! The first available broker (in priority order) that handles a request
//! claims it entirely: its price, its commit action, its events. There is
//! no merge across brokers and no per-call fallback to lower priorities
//! unless [`UnpriceablePolicy::FallThrough`] is configured explicitly.

use broker_core::{Amount, BrokerDescriptor, FailureReason, TransactionRecord, TransactionRequest};
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::entry::RegisteredBroker;
use crate::registry::BrokerRegistry;

/// What happens when the winning broker handles a subject but cannot price it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnpriceablePolicy {
    /// The transaction fails as not priceable. Lower priorities are not asked.
    Reject,
    /// Keep looking among lower priorities for a broker that can price it
    FallThrough,
}

/// The winning broker's answer is final
pub const DEFAULT_UNPRICEABLE_POLICY: UnpriceablePolicy = UnpriceablePolicy::Reject;

/// Read-only pricing result, no hooks run and nothing committed
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub broker: BrokerDescriptor,
    pub unit_price: Amount,
    /// Unit price times quantity
    pub value: Amount,
    pub display_name: Option<String>,
}

/// Result of walking a snapshot for a request
enum Selection {
    Unhandled,
    NotPriceable(Arc<RegisteredBroker>),
    Priced {
        entry: Arc<RegisteredBroker>,
        unit_price: Amount,
        value: Amount,
    },
    Faulted(Arc<RegisteredBroker>, String),
}

impl BrokerRegistry {
    /// Execute a priced action through the broker that claims it
    ///
    /// Total: every outcome, including broker faults, comes back as a
    /// finished record.
    pub fn transact(&self, request: TransactionRequest) -> TransactionRecord {
        debug!(
            "Dispatching {} of {} x{} [{}]",
            request.operation(),
            request.subject(),
            request.quantity(),
            request.subject_type()
        );

        let selection = self.select(&request);
        let builder = TransactionRecord::start(request);

        let (entry, unit_price, value) = match selection {
            Selection::Unhandled => {
                debug!("No broker handles {}", builder.request().subject());
                return builder.build_failure(FailureReason::Unhandled);
            }
            Selection::NotPriceable(entry) => {
                debug!(
                    "Broker {} cannot price {}",
                    entry.descriptor(),
                    builder.request().subject()
                );
                return builder
                    .with_broker(entry.descriptor().clone())
                    .build_failure(FailureReason::NotPriceable);
            }
            Selection::Faulted(entry, fault) => {
                error!("Broker {} faulted during selection: {}", entry.descriptor(), fault);
                return builder
                    .with_broker(entry.descriptor().clone())
                    .build_failure(FailureReason::InternalFault(fault));
            }
            Selection::Priced {
                entry,
                unit_price,
                value,
            } => (entry, unit_price, value),
        };

        let descriptor = entry.descriptor().clone();
        let broker = entry.broker();
        let mut builder = builder.with_broker(descriptor.clone());

        if let Ok(Some(name)) = guarded(|| broker.display_name(builder.request())) {
            builder = builder.with_display_name(name);
        }

        let commit = match guarded(|| broker.commit_action(builder.request(), value)) {
            Ok(commit) => commit,
            Err(fault) => {
                error!("Broker {} faulted building its commit action: {}", descriptor, fault);
                return builder.build_failure(FailureReason::InternalFault(fault));
            }
        };

        let mut pending = builder.authorize(descriptor.clone(), unit_price, value, commit);

        let view = pending.view();
        match guarded(|| self.pipeline.on_pre_process(&descriptor, &view)) {
            Ok(false) => {}
            Ok(true) => {
                debug!("Transaction through {} cancelled by pre-process hook", descriptor);
                return pending.build_failure(FailureReason::Cancelled);
            }
            Err(fault) => {
                error!("Pre-process hook faulted for {}: {}", descriptor, fault);
                return pending.build_failure(FailureReason::InternalFault(fault));
            }
        }

        if let Some(action) = pending.take_commit_action() {
            let fault = match guarded(action) {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(panic) => Some(panic),
            };
            if let Some(fault) = fault {
                error!("Commit action of {} failed: {}", descriptor, fault);
                return pending.build_failure(FailureReason::InternalFault(fault));
            }
        }

        let record = pending.build_success();
        debug!("Transaction through {} committed, value {}", descriptor, value);

        if let Err(fault) = guarded(|| self.pipeline.on_complete(&descriptor, &record)) {
            warn!("Completion hook faulted for {}: {}", descriptor, fault);
        }
        record
    }

    /// Resolve and price a request without running hooks or side effects
    pub fn quote(&self, request: &TransactionRequest) -> Option<Quote> {
        match self.select(request) {
            Selection::Priced {
                entry,
                unit_price,
                value,
            } => {
                let display_name = guarded(|| entry.broker().display_name(request))
                    .ok()
                    .flatten();
                Some(Quote {
                    broker: entry.descriptor().clone(),
                    unit_price,
                    value,
                    display_name,
                })
            }
            _ => None,
        }
    }

    /// Walk the subject type's snapshot and pick the serving broker
    fn select(&self, request: &TransactionRequest) -> Selection {
        let snapshot = self.resolve(request.subject_type());
        let fall_through = self.policy() == UnpriceablePolicy::FallThrough;
        let mut first_unpriceable: Option<Arc<RegisteredBroker>> = None;

        for entry in snapshot.iter() {
            if !entry.is_available() {
                debug!("Skipping unavailable broker {}", entry.descriptor());
                continue;
            }

            match guarded(|| entry.broker().handles(request)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(fault) => return Selection::Faulted(entry.clone(), fault),
            }

            let unit_price = match guarded(|| entry.broker().unit_price(request)) {
                Ok(price) => price,
                Err(fault) => return Selection::Faulted(entry.clone(), fault),
            };

            match unit_price.and_then(|p| priced(p, request)) {
                Some((unit_price, value)) => {
                    return Selection::Priced {
                        entry: entry.clone(),
                        unit_price,
                        value,
                    };
                }
                None if fall_through => {
                    debug!(
                        "Broker {} cannot price {}, falling through",
                        entry.descriptor(),
                        request.subject()
                    );
                    first_unpriceable.get_or_insert_with(|| entry.clone());
                }
                None => return Selection::NotPriceable(entry.clone()),
            }
        }

        match first_unpriceable {
            Some(entry) => Selection::NotPriceable(entry),
            None => Selection::Unhandled,
        }
    }
}

/// Positive unit price and its total for the request's quantity
fn priced(unit_price: Amount, request: &TransactionRequest) -> Option<(Amount, Amount)> {
    if unit_price <= Decimal::ZERO {
        return None;
    }
    let value = unit_price.checked_mul(Decimal::from(request.quantity()))?;
    Some((unit_price, value))
}

/// Run broker or hook code, turning a panic into a fault message
pub(crate) fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
