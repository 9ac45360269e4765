use serde::{Deserialize, Serialize};

use crate::values::{Priority, SubjectType};

/// Identity of a registered broker: `(provider, id, subject_type)`
///
/// Priority is deliberately not part of the identity, so the same broker
/// cannot be registered twice under different priorities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrokerIdentity {
    pub provider: String,
    pub id: String,
    pub subject_type: SubjectType,
}

impl BrokerIdentity {
    pub fn new(
        provider: impl Into<String>,
        id: impl Into<String>,
        subject_type: impl Into<SubjectType>,
    ) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
            subject_type: subject_type.into(),
        }
    }
}

impl std::fmt::Display for BrokerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}[{}]", self.provider, self.id, self.subject_type)
    }
}

/// Immutable description of a broker, captured once at registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrokerDescriptor {
    /// Self-reported identifier, unique per provider and subject type
    pub id: String,
    /// Name of the system supplying the implementation
    pub provider: String,
    pub priority: Priority,
    pub subject_type: SubjectType,
}

impl BrokerDescriptor {
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        priority: Priority,
        subject_type: impl Into<SubjectType>,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            priority,
            subject_type: subject_type.into(),
        }
    }

    /// The `(provider, id, subject_type)` triple that makes this broker unique
    pub fn identity(&self) -> BrokerIdentity {
        BrokerIdentity {
            provider: self.provider.clone(),
            id: self.id.clone(),
            subject_type: self.subject_type.clone(),
        }
    }

    /// True if both descriptors name the same broker, whatever their priority
    pub fn same_identity(&self, other: &BrokerDescriptor) -> bool {
        self.id == other.id
            && self.provider == other.provider
            && self.subject_type == other.subject_type
    }

    pub fn matches(&self, identity: &BrokerIdentity) -> bool {
        self.id == identity.id
            && self.provider == identity.provider
            && self.subject_type == identity.subject_type
    }
}

impl std::fmt::Display for BrokerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}[{}] (priority {})",
            self.provider, self.id, self.subject_type, self.priority
        )
    }
}
