use broker_core::{BrokerIdentity, SubjectType};
use broker_ports::{Broker, EventPipeline, NoopPipeline, ReloadListener};
use dashmap::DashMap;
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::dispatch::{DEFAULT_UNPRICEABLE_POLICY, UnpriceablePolicy, guarded};
use crate::entry::RegisteredBroker;
use crate::type_registry::{Snapshot, TypeRegistry};

/// Maps subject types to their ordered brokers
///
/// The registry owns every [`TypeRegistry`]; callers only ever see
/// immutable snapshots. It is `Send + Sync` and meant to be shared behind an
/// `Arc` by adapters (register/unregister) and callers (transact).
pub struct BrokerRegistry {
    types: DashMap<SubjectType, Arc<TypeRegistry>>,
    pub(crate) pipeline: Arc<dyn EventPipeline>,
    /// Registry-wide insertion counter, gives equal priorities a stable order
    sequence: AtomicU64,
    generation: AtomicU64,
    reload_listeners: RwLock<Vec<Arc<dyn ReloadListener>>>,
    fall_through: AtomicBool,
}

impl BrokerRegistry {
    /// Create a registry with no event pipeline wired
    pub fn new() -> Self {
        Self::with_pipeline(Arc::new(NoopPipeline))
    }

    /// Create a registry that reports to the given pipeline
    pub fn with_pipeline(pipeline: Arc<dyn EventPipeline>) -> Self {
        Self {
            types: DashMap::new(),
            pipeline,
            sequence: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            reload_listeners: RwLock::new(Vec::new()),
            fall_through: AtomicBool::new(matches!(
                DEFAULT_UNPRICEABLE_POLICY,
                UnpriceablePolicy::FallThrough
            )),
        }
    }

    /// Builder-style policy override
    pub fn with_policy(self, policy: UnpriceablePolicy) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn policy(&self) -> UnpriceablePolicy {
        if self.fall_through.load(Ordering::Acquire) {
            UnpriceablePolicy::FallThrough
        } else {
            UnpriceablePolicy::Reject
        }
    }

    pub fn set_policy(&self, policy: UnpriceablePolicy) {
        let fall_through = matches!(policy, UnpriceablePolicy::FallThrough);
        if self.fall_through.swap(fall_through, Ordering::AcqRel) != fall_through {
            info!("Unpriceable policy set to {:?}", policy);
        }
    }

    /// Register a broker under its subject type
    ///
    /// Returns false, changing nothing, if a broker with the same
    /// `(provider, id, subject_type)` is already registered.
    pub fn register(&self, broker: Arc<dyn Broker>) -> bool {
        let descriptor = broker.descriptor();
        let registry = self.type_registry_or_create(&descriptor.subject_type);

        if registry.contains(&descriptor.identity()) {
            debug!("Broker {} already registered", descriptor);
            return false;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(RegisteredBroker::new(broker, descriptor, sequence));
        if !registry.insert(entry.clone()) {
            debug!("Broker {} already registered", entry.descriptor());
            return false;
        }

        info!(
            "Registered broker {} (available: {})",
            entry.descriptor(),
            entry.is_available()
        );
        if let Err(fault) = guarded(|| self.pipeline.on_register(entry.descriptor())) {
            warn!("Register hook faulted for {}: {}", entry.descriptor(), fault);
        }
        true
    }

    /// Unregister a broker by its identity
    ///
    /// Returns false if no such broker was registered; no notification fires.
    pub fn unregister(&self, broker: &dyn Broker) -> bool {
        let identity =
            BrokerIdentity::new(broker.provider(), broker.id(), broker.subject_type().clone());
        self.unregister_by_identity(&identity)
    }

    /// Unregister for hosts that no longer hold the broker itself
    pub fn unregister_by_identity(&self, identity: &BrokerIdentity) -> bool {
        let Some(registry) = self.type_registry(&identity.subject_type) else {
            return false;
        };

        match registry.remove(identity) {
            Some(removed) => {
                info!("Unregistered broker {}", removed.descriptor());
                if let Err(fault) = guarded(|| self.pipeline.on_unregister(removed.descriptor())) {
                    warn!("Unregister hook faulted for {}: {}", removed.descriptor(), fault);
                }
                true
            }
            None => false,
        }
    }

    /// Brokers of a subject type, highest priority first
    ///
    /// Empty if the subject type is unknown.
    pub fn resolve(&self, subject_type: &SubjectType) -> Snapshot {
        match self.type_registry(subject_type) {
            Some(registry) => registry.snapshot(),
            None => Arc::new(Vec::new()),
        }
    }

    /// Subject types that have a registry, sorted
    pub fn subject_types(&self) -> Vec<SubjectType> {
        let mut types: Vec<SubjectType> = self.types.iter().map(|e| e.key().clone()).collect();
        types.sort();
        types
    }

    /// Every registered broker, grouped by subject type in priority order
    pub fn brokers(&self) -> Vec<Arc<RegisteredBroker>> {
        self.subject_types()
            .iter()
            .flat_map(|t| self.resolve(t).iter().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// Provider name mapped to the ids of its registered brokers
    pub fn available(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut available: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for entry in self.brokers() {
            let descriptor = entry.descriptor();
            available
                .entry(descriptor.provider.clone())
                .or_default()
                .insert(descriptor.id.clone());
        }
        available
    }

    pub fn contains(&self, identity: &BrokerIdentity) -> bool {
        self.type_registry(&identity.subject_type)
            .is_some_and(|r| r.contains(identity))
    }

    /// Total number of registered brokers
    pub fn len(&self) -> usize {
        self.types.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-check every broker's availability predicate
    ///
    /// Returns how many brokers are available afterwards.
    pub fn refresh_availability(&self) -> usize {
        let mut available = 0;
        for entry in self.brokers() {
            let was = entry.is_available();
            let now = entry.refresh_availability();
            if was != now {
                info!("Broker {} availability changed to {}", entry.descriptor(), now);
            }
            if now {
                available += 1;
            }
        }
        available
    }

    /// Subscribe a collaborator to reload signals
    pub fn subscribe_reload(&self, listener: Arc<dyn ReloadListener>) {
        self.reload_listeners.write().push(listener);
    }

    /// Signal collaborators to re-read configuration and re-register
    ///
    /// Clears nothing: the registry holds no configuration of its own.
    /// Returns the new reload generation.
    pub fn reload(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        // Clone out so listeners may subscribe or register without deadlocking
        let listeners: Vec<_> = self.reload_listeners.read().iter().cloned().collect();

        info!(
            "Reload generation {} signalled to {} listener(s)",
            generation,
            listeners.len()
        );
        for listener in listeners {
            listener.on_reload(generation);
        }
        generation
    }

    /// Number of reloads signalled so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn type_registry(&self, subject_type: &SubjectType) -> Option<Arc<TypeRegistry>> {
        self.types.get(subject_type).map(|r| Arc::clone(r.value()))
    }

    fn type_registry_or_create(&self, subject_type: &SubjectType) -> Arc<TypeRegistry> {
        // Fast path: check if exists
        if let Some(registry) = self.type_registry(subject_type) {
            return registry;
        }

        // Slow path: create new entry
        self.types
            .entry(subject_type.clone())
            .or_insert_with(|| Arc::new(TypeRegistry::new(subject_type.clone())))
            .clone()
    }
}

impl Default for BrokerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BrokerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerRegistry")
            .field("subject_types", &self.subject_types())
            .field("brokers", &self.len())
            .field("generation", &self.generation())
            .field("policy", &self.policy())
            .finish()
    }
}
