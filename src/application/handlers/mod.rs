//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, one
//! module per component.

pub mod confirmation;
pub mod payment;
pub mod session;
pub mod stage;
