use arc_swap::ArcSwap;
use broker_core::{BrokerIdentity, SubjectType};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::entry::RegisteredBroker;

/// Immutable, ordered view of one subject type's brokers
pub type Snapshot = Arc<Vec<Arc<RegisteredBroker>>>;

/// Ordered brokers of one subject type.
///
/// - Reads: `load()` of the current snapshot, never blocked
/// - Writes: serialized on `write_lock`, clone + modify + `store()`
///
/// A dispatch that loaded a snapshot keeps seeing exactly that ordering even
/// if brokers are added or removed while it runs.
pub struct TypeRegistry {
    subject_type: SubjectType,
    entries: ArcSwap<Vec<Arc<RegisteredBroker>>>,
    write_lock: Mutex<()>,
}

impl TypeRegistry {
    pub fn new(subject_type: SubjectType) -> Self {
        Self {
            subject_type,
            entries: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn subject_type(&self) -> &SubjectType {
        &self.subject_type
    }

    /// Current ordered snapshot, highest priority first
    pub fn snapshot(&self) -> Snapshot {
        self.entries.load_full()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    pub fn contains(&self, identity: &BrokerIdentity) -> bool {
        self.entries
            .load()
            .iter()
            .any(|e| e.descriptor().matches(identity))
    }

    /// Insert at the entry's position. Returns false if its identity is taken.
    pub(crate) fn insert(&self, entry: Arc<RegisteredBroker>) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.entries.load();

        if current
            .iter()
            .any(|e| e.descriptor().same_identity(entry.descriptor()))
        {
            return false;
        }

        // Sorted by position, so binary search finds the slot
        let key = entry.position();
        let index = current.partition_point(|e| e.position() < key);

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current[..index].iter().cloned());
        next.push(entry);
        next.extend(current[index..].iter().cloned());

        self.entries.store(Arc::new(next));
        true
    }

    /// Remove by identity, returning the removed entry if there was one
    pub(crate) fn remove(&self, identity: &BrokerIdentity) -> Option<Arc<RegisteredBroker>> {
        let _guard = self.write_lock.lock();
        let current = self.entries.load();

        let index = current
            .iter()
            .position(|e| e.descriptor().matches(identity))?;

        let mut next: Vec<_> = current.iter().cloned().collect();
        let removed = next.remove(index);

        self.entries.store(Arc::new(next));
        Some(removed)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("subject_type", &self.subject_type)
            .field("entries", &self.snapshot())
            .finish()
    }
}
