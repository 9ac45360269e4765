//! Broker Registry
//!
//! Priority-ordered registry of [`Broker`](broker_ports::Broker)
//! implementations and the dispatch algorithm that serves transactions
//! through them.
//!
//! ## Architecture
//!
//! ```text
//!                  BrokerRegistry
//!   ┌──────────────────────────────────────────────┐
//!   │ DashMap<SubjectType, TypeRegistry>            │
//!   │                                              │
//!   │  "item"       ──► [B(50), A(10), W(-100)]     │  ArcSwap snapshot,
//!   │  "permission" ──► [P(-100)]                   │  copy-on-write
//!   └──────────────────────────────────────────────┘
//!                        │ transact(request)
//!                        ▼
//!   first available broker that handles ──► price ──► pre-process hooks
//!                                                       │
//!                                   cancelled ◄─────────┤
//!                                                       ▼
//!                                              commit ──► on_complete
//! ```
//!
//! ## Concurrency
//!
//! Readers load an immutable snapshot of a subject type's brokers and never
//! take a lock. Writers of one subject type serialize on a mutex, build a
//! new snapshot and publish it atomically.

pub mod dispatch;
pub mod entry;
pub mod registry;
pub mod type_registry;

pub use dispatch::{DEFAULT_UNPRICEABLE_POLICY, Quote, UnpriceablePolicy};
pub use entry::RegisteredBroker;
pub use registry::BrokerRegistry;
pub use type_registry::{Snapshot, TypeRegistry};
