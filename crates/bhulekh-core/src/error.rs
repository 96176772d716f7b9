use crate::store::StoreError;
use crate::types::{Assignee, Role};
use thiserror::Error;

/// Workflow errors surfaced to the invoke caller.
///
/// Every error is terminal for the call: validation runs before the single
/// store write, so a failed call leaves no write applied.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid invoke function.")]
    UnknownOperation,

    #[error("invalid argument(s) count.")]
    ArgumentCount,

    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("citizen does not exist")]
    CitizenNotFound,

    #[error("application does not exist")]
    ApplicationNotFound,

    /// The acting role is not the record's current assignee.
    #[error("rejected transition: '{role}' is not the current assignee ('{assignee}')")]
    RejectedTransition { role: Role, assignee: Assignee },

    #[error("payment confirmation already complete")]
    PaymentAlreadyComplete,

    #[error(transparent)]
    Store(#[from] StoreError),
}
