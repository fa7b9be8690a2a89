//! Notifier adapters.
//!
//! - `LoggingNotifier` - records that a message went out, never its body
//! - `InMemoryNotifier` - keeps delivered messages for tests and local runs

mod in_memory;
mod logging;

pub use in_memory::{DeliveredMessage, InMemoryNotifier};
pub use logging::LoggingNotifier;
