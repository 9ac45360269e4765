//! Broker Runner
//!
//! Host side of the broker registry:
//!
//! - **Config**: JSON broker configuration, file or embedded
//! - **PriceListBroker**: configured broker answering from price tables
//! - **Service**: registers the configured defaults and drives reload
//! - **Metrics**: counts polled from the registry
//! - **Commands**: `list`, `reload`, `quote`, `metrics` for the `brokerctl` binary
//!
//! ## Architecture
//!
//! ```text
//!   brokerctl ──► commands ──► BrokerService ──► BrokerRegistry
//!                                  │   ▲
//!                        ConfigSource  └── PriceListBroker ──► Ledger
//! ```

pub mod commands;
pub mod config;
pub mod ledger;
pub mod metrics;
pub mod price_list;
pub mod service;

pub use config::{
    BrokerConfig, BrokerConfigFile, ConfigError, ConfigSource, FileSource, PolicySetting,
    StaticSource, load_config, load_config_from_str, load_default_config,
};
pub use ledger::{Ledger, LedgerEntry};
pub use metrics::RegistryMetrics;
pub use price_list::PriceListBroker;
pub use service::BrokerService;
