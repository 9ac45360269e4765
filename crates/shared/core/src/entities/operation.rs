use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RequestError;

/// Direction of a transaction, seen from the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// The actor acquires the subject and pays for it
    Buy,
    /// The actor gives up the subject and is paid for it
    Sell,
}

impl Operation {
    /// Returns the opposite operation
    pub fn opposite(&self) -> Self {
        match self {
            Operation::Buy => Operation::Sell,
            Operation::Sell => Operation::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Buy => "buy",
            Operation::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "purchase" => Ok(Operation::Buy),
            "sell" | "sale" => Ok(Operation::Sell),
            other => Err(RequestError::UnknownOperation(other.to_string())),
        }
    }
}
