//! Broker Ports
//!
//! Port definitions (traits) for the broker registry.
//! These define the boundaries between the dispatch core and the
//! implementations or hosts plugged into it.

mod broker;
mod pipeline;
mod reload;

pub use broker::Broker;
pub use pipeline::{EventPipeline, NoopPipeline};
pub use reload::ReloadListener;

// Re-export the error types brokers produce
pub use broker_core::{CommitError, RequestError};
