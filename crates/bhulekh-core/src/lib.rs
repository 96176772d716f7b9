//! Land-mutation application workflow over a key-value state ledger.
//!
//! This crate holds the domain records (citizens and applications), the
//! composite-key codec and store contract the surrounding ledger platform
//! implements, and the role-gated workflow engine that advances an
//! application through its fixed reviewing sequence. Transport, caller
//! authentication, and replication are the platform's concern.

#![deny(unsafe_code)]

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod keys;
pub mod store;
pub mod types;
pub mod workflow;

pub use dispatch::Operation;
pub use engine::{WorkflowEngine, APPLICATION_PREFIX, CITIZEN_PREFIX};
pub use error::WorkflowError;
pub use store::{MemoryStore, ScanStream, StateStore, StoreError};
pub use types::{
    Application, ApplicationFilter, ApplicationRef, Assignee, Citizen, CitizenQuery, CitizenRef,
    EstateReview, HearingResponse, PaymentConfirmation, ReviewNote, Role, Status,
};
pub use workflow::{ReviewAction, Transition, WorkflowEvent};
