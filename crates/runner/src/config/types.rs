use broker_core::{Amount, FALLBACK_PRIORITY, Priority, SubjectType};
use broker_registry::{DEFAULT_UNPRICEABLE_POLICY, UnpriceablePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the broker host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfigFile {
    #[serde(default)]
    pub unpriceable_policy: PolicySetting,
    #[serde(default)]
    pub brokers: Vec<BrokerConfig>,
}

/// Configuration of a single default broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Identifier, unique per provider and subject type
    pub id: String,
    /// System supplying the prices (e.g., "EssentialsX")
    pub provider: String,
    pub subject_type: SubjectType,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    /// Whether the provider is present; disabled brokers are not registered
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Unit prices for purchases, by subject
    #[serde(default)]
    pub buy: BTreeMap<String, Amount>,
    /// Unit prices for sales, by subject
    #[serde(default)]
    pub sell: BTreeMap<String, Amount>,
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
}

/// Serialized form of the registry's unpriceable policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySetting {
    Reject,
    FallThrough,
}

impl Default for PolicySetting {
    fn default() -> Self {
        DEFAULT_UNPRICEABLE_POLICY.into()
    }
}

impl From<UnpriceablePolicy> for PolicySetting {
    fn from(policy: UnpriceablePolicy) -> Self {
        match policy {
            UnpriceablePolicy::Reject => PolicySetting::Reject,
            UnpriceablePolicy::FallThrough => PolicySetting::FallThrough,
        }
    }
}

impl From<PolicySetting> for UnpriceablePolicy {
    fn from(setting: PolicySetting) -> Self {
        match setting {
            PolicySetting::Reject => UnpriceablePolicy::Reject,
            PolicySetting::FallThrough => UnpriceablePolicy::FallThrough,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_priority() -> Priority {
    FALLBACK_PRIORITY
}
