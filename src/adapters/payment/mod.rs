//! Payment gateway adapters.
//!
//! - `HttpPaymentGateway` - REST gateway client over `reqwest`
//! - `MockPaymentGateway` - in-process gateway for development and tests

mod http_gateway;
mod mock_gateway;

pub use http_gateway::{HttpGatewayConfig, HttpPaymentGateway};
pub use mock_gateway::{GatewayCall, MockPaymentGateway};
