//! Host service managing the configured default brokers
//!
//! ```text
//! start()   load config ─► validate ─► register available defaults
//! reload()  unregister managed ─► registry.reload() ─► load config
//!               ├─ ok:  register new defaults
//!               └─ err: re-register previous defaults, return the error
//! stop()    unregister managed
//! ```
//!
//! Every lifecycle operation holds the service lock from start to finish,
//! so two reloads never interleave.

use broker_core::BrokerDescriptor;
use broker_ports::Broker;
use broker_registry::BrokerRegistry;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::{BrokerConfigFile, ConfigError, ConfigSource};
use crate::ledger::Ledger;
use crate::price_list::PriceListBroker;

#[derive(Default)]
struct ServiceState {
    /// Last configuration that was applied successfully
    config: Option<BrokerConfigFile>,
    /// Defaults this service registered and still owns
    managed: Vec<Arc<PriceListBroker>>,
}

pub struct BrokerService {
    registry: Arc<BrokerRegistry>,
    source: Box<dyn ConfigSource>,
    ledger: Arc<Ledger>,
    state: Mutex<ServiceState>,
}

impl BrokerService {
    pub fn new(registry: Arc<BrokerRegistry>, source: impl ConfigSource + 'static) -> Self {
        Self {
            registry,
            source: Box::new(source),
            ledger: Arc::new(Ledger::new()),
            state: Mutex::new(ServiceState::default()),
        }
    }

    pub fn registry(&self) -> &Arc<BrokerRegistry> {
        &self.registry
    }

    /// Ledger shared by every managed default
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Load configuration and register the available defaults
    ///
    /// Returns how many defaults were registered. Starting a running service
    /// changes nothing.
    pub fn start(&self) -> Result<usize, ConfigError> {
        let mut state = self.state.lock();
        if state.config.is_some() {
            log::debug!("Broker service already started");
            return Ok(state.managed.len());
        }

        let config = self.load()?;
        let registered = self.register_defaults(&mut state, &config);
        state.config = Some(config);
        log::info!(
            "Broker service started from {} with {} defaults",
            self.source.describe(),
            registered
        );
        Ok(registered)
    }

    /// Unregister every managed default
    pub fn stop(&self) -> usize {
        let mut state = self.state.lock();
        let removed = self.unregister_defaults(&mut state);
        state.config = None;
        log::info!("Broker service stopped, {} defaults unregistered", removed);
        removed
    }

    /// Unregister defaults, signal the registry, re-read config, re-register
    ///
    /// If the configuration cannot be read, the previous one is registered
    /// again and the error returned.
    pub fn reload(&self) -> Result<usize, ConfigError> {
        let mut state = self.state.lock();
        self.unregister_defaults(&mut state);
        let generation = self.registry.reload();

        match self.load() {
            Ok(config) => {
                let registered = self.register_defaults(&mut state, &config);
                state.config = Some(config);
                log::info!(
                    "Reload {} complete, {} defaults registered",
                    generation,
                    registered
                );
                Ok(registered)
            }
            Err(err) => {
                log::warn!(
                    "Reload {} failed ({}), restoring previous configuration",
                    generation,
                    err
                );
                if let Some(previous) = state.config.clone() {
                    self.register_defaults(&mut state, &previous);
                }
                Err(err)
            }
        }
    }

    /// A provider went away: drop the defaults it backed
    pub fn provider_disabled(&self, provider: &str) -> usize {
        let mut state = self.state.lock();
        let mut removed = 0;
        loop {
            let Some(index) = state
                .managed
                .iter()
                .position(|broker| broker.provider() == provider)
            else {
                break;
            };
            if self.registry.unregister(state.managed[index].as_ref()) {
                removed += 1;
            }
            state.managed.remove(index);
        }
        if removed > 0 {
            log::info!("Provider {} disabled, {} defaults unregistered", provider, removed);
        }
        removed
    }

    /// Provider name mapped to its registered broker ids
    pub fn available(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.registry.available()
    }

    /// Descriptors of the defaults currently owned by this service
    pub fn managed(&self) -> Vec<BrokerDescriptor> {
        self.state
            .lock()
            .managed
            .iter()
            .map(|broker| broker.descriptor())
            .collect()
    }

    fn load(&self) -> Result<BrokerConfigFile, ConfigError> {
        let config = self.source.load()?;
        config.validate()?;
        Ok(config)
    }

    fn register_defaults(&self, state: &mut ServiceState, config: &BrokerConfigFile) -> usize {
        self.registry.set_policy(config.unpriceable_policy.into());

        let enabled = config.enabled_brokers();
        if enabled.len() < config.brokers.len() {
            log::debug!(
                "{} default brokers disabled, skipped",
                config.brokers.len() - enabled.len()
            );
        }

        for broker_config in enabled {
            let broker = Arc::new(PriceListBroker::from_config(
                broker_config,
                self.ledger.clone(),
            ));
            if self.registry.register(broker.clone()) {
                state.managed.push(broker);
            } else {
                log::warn!(
                    "Default broker {} already registered elsewhere",
                    broker.identity()
                );
            }
        }
        state.managed.len()
    }

    /// A default leaves the managed list only once its unregister returned,
    /// so an interrupted pass is finished by the next one.
    fn unregister_defaults(&self, state: &mut ServiceState) -> usize {
        let mut removed = 0;
        while let Some(broker) = state.managed.last().cloned() {
            if self.registry.unregister(broker.as_ref()) {
                removed += 1;
            }
            state.managed.pop();
        }
        removed
    }
}

impl std::fmt::Debug for BrokerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerService")
            .field("source", &self.source.describe())
            .field("managed", &self.state.lock().managed.len())
            .finish()
    }
}
