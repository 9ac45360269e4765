//! Broker Events
//!
//! Realizations of the registry's [`EventPipeline`](broker_ports::EventPipeline)
//! port. The registry itself only knows the trait; hosts pick one of these
//! (or their own) when building it.
//!
//! - [`EventHandlers`]: one optional closure per hook
//! - [`CompositePipeline`]: fans out to several pipelines
//! - [`EventBus`]: tokio broadcast channel for async observers, with
//!   synchronous veto closures for pre-process
//!
//! ## Architecture
//!
//! ```text
//! BrokerRegistry ──hooks──► EventBus ──broadcast──► EventSubscriber (task)
//!                              │                 └─► EventSubscriber (task)
//!                              └── vetoes (sync, on the dispatching thread)
//! ```

pub mod bus;
pub mod composite;
pub mod error;
pub mod handlers;

pub use bus::{BrokerEvent, DEFAULT_BUS_CAPACITY, EventBus, EventSubscriber};
pub use composite::CompositePipeline;
pub use error::{EventError, Result};
pub use handlers::EventHandlers;
