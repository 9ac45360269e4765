use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary amount - uses Decimal for precision
pub type Amount = Decimal;

/// Number of units moved by one transaction
pub type Quantity = u32;

/// Actor (player, account) a transaction is performed for
pub type ActorId = Uuid;

/// Location (world, region, shop) a transaction is performed in
pub type LocationId = Uuid;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Broker priority within one subject type. Higher values are consulted first.
pub type Priority = i8;

/// Priority given to brokers that do not state their own.
///
/// Generic implementations sit here so that purpose-built registrations
/// outrank them without any reconfiguration.
pub const FALLBACK_PRIORITY: Priority = -100;

/// Tag naming the kind of subject a broker trades: `item`, `permission`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectType(String);

impl SubjectType {
    /// Create a new subject type tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubjectType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubjectType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&SubjectType> for SubjectType {
    fn from(s: &SubjectType) -> Self {
        s.clone()
    }
}
