use broker_core::BrokerIdentity;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::{BrokerConfig, BrokerConfigFile};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Broker {0} is missing an id or provider")]
    MissingIdentity(String),
    #[error("Duplicate broker: {0}")]
    DuplicateBroker(BrokerIdentity),
    #[error("Negative price for {subject} in broker {broker}")]
    NegativePrice {
        broker: BrokerIdentity,
        subject: String,
    },
}

/// Load broker configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BrokerConfigFile, ConfigError> {
    let path = path.as_ref();
    debug!("Loading broker config from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<BrokerConfigFile, ConfigError> {
    let config: BrokerConfigFile = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<BrokerConfigFile, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}

impl BrokerConfig {
    pub fn identity(&self) -> BrokerIdentity {
        BrokerIdentity::new(&self.provider, &self.id, self.subject_type.clone())
    }
}

impl BrokerConfigFile {
    /// Get only enabled brokers
    pub fn enabled_brokers(&self) -> Vec<&BrokerConfig> {
        self.brokers.iter().filter(|b| b.enabled).collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for broker in &self.brokers {
            if broker.id.trim().is_empty() || broker.provider.trim().is_empty() {
                return Err(ConfigError::MissingIdentity(broker.identity().to_string()));
            }
            if !seen.insert(broker.identity()) {
                return Err(ConfigError::DuplicateBroker(broker.identity()));
            }
            let negative = broker
                .buy
                .iter()
                .chain(broker.sell.iter())
                .find(|(_, price)| **price < Decimal::ZERO);
            if let Some((subject, _)) = negative {
                return Err(ConfigError::NegativePrice {
                    broker: broker.identity(),
                    subject: subject.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();
        assert!(!config.brokers.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_enabled_brokers() {
        let config = load_default_config().unwrap();
        let enabled = config.enabled_brokers();
        assert!(enabled.iter().any(|b| b.id == "EssentialsXBroker"));
        assert!(!enabled.iter().any(|b| b.id == "ZShopBroker"));
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let config = load_config_from_str(
            r#"{"brokers": [
                {"id": "shop", "provider": "zShop", "subject_type": "item"},
                {"id": "shop", "provider": "zShop", "subject_type": "item", "priority": 5}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateBroker(_))
        ));
    }

    #[test]
    fn test_same_id_other_subject_type_allowed() {
        let config = load_config_from_str(
            r#"{"brokers": [
                {"id": "shop", "provider": "zShop", "subject_type": "item"},
                {"id": "shop", "provider": "zShop", "subject_type": "permission"}
            ]}"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let config = load_config_from_str(
            r#"{"brokers": [
                {"id": "shop", "provider": "zShop", "subject_type": "item",
                 "sell": {"dirt": "-1"}}
            ]}"#,
        )
        .unwrap();
        match config.validate() {
            Err(ConfigError::NegativePrice { subject, .. }) => assert_eq!(subject, "dirt"),
            other => panic!("expected negative price error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/brokers.json");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            load_config_from_str("{\"brokers\": [}"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
