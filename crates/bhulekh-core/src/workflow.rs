//! The canonical role-gated transition table.
//!
//! Every role action funnels through [`apply`], which checks the acting
//! role against the record's current assignee before consulting the table.
//! A rejected gate is an explicit error, never a silent re-persist.

use crate::error::WorkflowError;
use crate::types::{Assignee, Role, Status};
use serde::{Deserialize, Serialize};

/// Decision selected by the estate office while reviewing an application.
///
/// Tokens outside the decided set fall into [`ReviewAction::Deferred`],
/// which leaves the record untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ReviewAction {
    SetHearingDate,
    ApplicationSentForCorrection,
    ApplicationRejected,
    Deferred,
}

impl From<String> for ReviewAction {
    fn from(token: String) -> Self {
        match token.as_str() {
            "SetHearingDate" => Self::SetHearingDate,
            "ApplicationSentForCorrection" => Self::ApplicationSentForCorrection,
            "ApplicationRejected" => Self::ApplicationRejected,
            _ => Self::Deferred,
        }
    }
}

/// A role-issued action against an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Supervisor forwards a fresh application to the estate office.
    SupervisorForward,
    /// Estate office decides how the application proceeds.
    EstateReview(ReviewAction),
    /// Citizen responds to a proposed hearing date.
    HearingResponse { accepted: bool },
    /// Estate office reports that the scheduled hearing took place.
    HearingHeld,
    /// CEO clears the application for payment collection.
    CeoClearance,
    /// Finance officer records the payment outcome.
    PaymentConfirmation { confirmed: bool },
}

impl WorkflowEvent {
    /// The party entitled to issue this event.
    pub fn role(self) -> Role {
        match self {
            Self::SupervisorForward => Role::Supervisor,
            Self::EstateReview(_) | Self::HearingHeld => Role::EstateOfficer,
            Self::HearingResponse { .. } => Role::Citizen,
            Self::CeoClearance => Role::Ceo,
            Self::PaymentConfirmation { .. } => Role::FinanceOfficer,
        }
    }
}

/// Assignment and status after a successful transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub assign_to: Assignee,
    pub status: Status,
}

/// Apply one role action to the current `(assign_to, status)` pair.
///
/// Fails with [`WorkflowError::RejectedTransition`] when the acting role is
/// not the current assignee, and with
/// [`WorkflowError::PaymentAlreadyComplete`] when the finance officer acts
/// on an application whose payment was already confirmed. Callers must not
/// rewrite the record on failure.
pub fn apply(
    assign_to: Assignee,
    status: Status,
    event: WorkflowEvent,
) -> Result<Transition, WorkflowError> {
    let role = event.role();
    if !assign_to.accepts(role) {
        return Err(WorkflowError::RejectedTransition {
            role,
            assignee: assign_to,
        });
    }

    let next = match event {
        WorkflowEvent::SupervisorForward => Transition {
            assign_to: Assignee::EstateOfficer,
            status: Status::InProgress,
        },
        WorkflowEvent::EstateReview(
            ReviewAction::SetHearingDate | ReviewAction::ApplicationSentForCorrection,
        ) => Transition {
            assign_to: Assignee::Citizen,
            status: Status::InProgress,
        },
        WorkflowEvent::EstateReview(ReviewAction::ApplicationRejected) => Transition {
            assign_to: Assignee::Cleared,
            status: Status::Rejected,
        },
        WorkflowEvent::EstateReview(ReviewAction::Deferred) => Transition { assign_to, status },
        WorkflowEvent::HearingResponse { accepted: true } => Transition {
            assign_to: Assignee::EstateOfficer,
            status,
        },
        WorkflowEvent::HearingResponse { accepted: false } => Transition { assign_to, status },
        WorkflowEvent::HearingHeld => Transition {
            assign_to: Assignee::Ceo,
            status,
        },
        WorkflowEvent::CeoClearance => Transition {
            assign_to: Assignee::FinanceOfficer,
            status,
        },
        WorkflowEvent::PaymentConfirmation { confirmed } => {
            if status == Status::Complete {
                return Err(WorkflowError::PaymentAlreadyComplete);
            }
            Transition {
                assign_to,
                status: if confirmed { Status::Complete } else { status },
            }
        }
    };

    Ok(next)
}
