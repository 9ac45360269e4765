mod descriptor;
mod operation;
mod outcome;
mod record;
mod request;

pub use descriptor::{BrokerDescriptor, BrokerIdentity};
pub use operation::Operation;
pub use outcome::{FailureReason, Outcome};
pub use record::{CommitAction, PendingRecord, PreProcessRecord, RecordBuilder, TransactionRecord};
pub use request::TransactionRequest;
