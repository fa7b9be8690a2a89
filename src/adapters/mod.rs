//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum REST API over the application handlers
//! - `memory` - In-process storage behind the repository and store ports
//! - `payment` - Mock and REST payment gateways
//! - `notifier` - Logging and recording notifiers
//! - `rate_limiter` - Rolling-window rate limiter
//! - `sweeper` - Background purge of expired challenges and tokens

pub mod http;
pub mod memory;
pub mod notifier;
pub mod payment;
pub mod rate_limiter;
pub mod sweeper;
