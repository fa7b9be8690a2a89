//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and the state machine trait
//! that form the vocabulary of the admissions domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::{
    ActorId, ApplicantId, ChallengeId, OrderId, RegistrationId, SelectionRecordId,
    SessionTokenId,
};
pub(crate) use ids::random_code;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
