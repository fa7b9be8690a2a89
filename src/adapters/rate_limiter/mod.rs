//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port.
//!
//! ## Usage
//!
//! ```ignore
//! use admissions_engine::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
//!
//! let limiter = InMemoryRateLimiter::new(RateLimitConfig::from_session(&config.session));
//! ```

mod config;
mod in_memory;

pub use config::{RateLimitConfig, WindowLimit};
pub use in_memory::InMemoryRateLimiter;
