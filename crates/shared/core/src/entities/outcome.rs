use serde::Serialize;

/// Why a transaction did not succeed
///
/// Hosts present these to users; the core only supplies the reason code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// No registered broker claims the subject for the operation
    Unhandled,
    /// The selected broker claims the subject but has no positive price
    NotPriceable,
    /// A pre-process hook vetoed the transaction
    Cancelled,
    /// The selected broker faulted while serving the transaction
    InternalFault(String),
}

impl FailureReason {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Unhandled => "unhandled",
            FailureReason::NotPriceable => "not priceable",
            FailureReason::Cancelled => "cancelled",
            FailureReason::InternalFault(_) => "internal fault",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::InternalFault(detail) => write!(f, "internal fault: {}", detail),
            other => f.write_str(other.code()),
        }
    }
}

/// Transaction lifecycle outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Priced and awaiting pre-process hooks; never the outcome of a finished record
    Pending,
    Success,
    Failure(FailureReason),
}

impl Outcome {
    /// Returns true if the transaction has finished
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            Outcome::Failure(reason) => Some(reason),
            _ => None,
        }
    }
}
