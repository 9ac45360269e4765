//! Registry metrics, collected by polling the introspection surface

use broker_registry::BrokerRegistry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Point-in-time view of what is registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryMetrics {
    /// Total registered brokers
    pub broker_count: usize,
    /// Registered brokers whose availability check passed
    pub available_count: usize,
    /// Subject type -> provider -> number of brokers
    pub implementations: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RegistryMetrics {
    pub fn collect(registry: &BrokerRegistry) -> Self {
        let mut metrics = RegistryMetrics {
            broker_count: 0,
            available_count: 0,
            implementations: BTreeMap::new(),
        };

        for entry in registry.brokers() {
            let descriptor = entry.descriptor();
            metrics.broker_count += 1;
            if entry.is_available() {
                metrics.available_count += 1;
            }
            *metrics
                .implementations
                .entry(descriptor.subject_type.to_string())
                .or_default()
                .entry(descriptor.provider.clone())
                .or_default() += 1;
        }
        metrics
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_config;
    use crate::ledger::Ledger;
    use crate::price_list::PriceListBroker;
    use std::sync::Arc;

    #[test]
    fn test_empty_registry() {
        let metrics = RegistryMetrics::collect(&BrokerRegistry::new());
        assert_eq!(metrics.broker_count, 0);
        assert!(metrics.implementations.is_empty());
    }

    #[test]
    fn test_counts_per_subject_type() {
        let registry = BrokerRegistry::new();
        let ledger = Arc::new(Ledger::new());
        for config in load_default_config().unwrap().brokers {
            registry.register(Arc::new(PriceListBroker::from_config(&config, ledger.clone())));
        }

        let metrics = RegistryMetrics::collect(&registry);
        assert_eq!(metrics.broker_count, 3);
        assert_eq!(metrics.available_count, 2);
        assert_eq!(metrics.implementations["item"]["EssentialsX"], 1);
        assert_eq!(metrics.implementations["item"]["zShop"], 1);
        assert_eq!(metrics.implementations["permission"]["BuyPermissions"], 1);

        let json = metrics.to_json().unwrap();
        assert!(json.contains("\"broker_count\": 3"));
    }
}
