//! Payment domain module.
//!
//! Payment orders, their forward-only status machine and the ledger errors.
//!
//! # Module Structure
//!
//! - `order` - PaymentOrder aggregate and gateway reports
//! - `status` - PaymentStatus state machine
//! - `money` - PaymentType labels and Money amounts
//! - `errors` - LedgerError

mod errors;
mod money;
mod order;
mod status;

pub use errors::LedgerError;
pub use money::{Money, PaymentType};
pub use order::{GatewayReport, PaymentOrder, ReportOutcome};
pub use status::PaymentStatus;
