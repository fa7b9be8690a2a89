//! Confirmation domain module.
//!
//! Single-use participation codes issued after final selection.

mod code;
mod errors;
mod status;

pub use code::{ConfirmOutcome, ConfirmationCode, CONFIRMATION_CODE_LEN};
pub use errors::ConfirmationError;
pub use status::ConfirmationStatus;
