//! Admissions Engine - Staged selection for competitive admissions
//!
//! Applicants log in with one-time codes, move through an ordered pipeline
//! of selection stages as reviewers record decisions, pay stage fees
//! through an external gateway, and finally confirm participation with a
//! single-use code.
//!
//! # Layout
//!
//! - `domain` - Aggregates, value objects and state machines
//! - `ports` - Storage and external service contracts
//! - `application` - Command and query handlers
//! - `adapters` - HTTP API, in-memory storage, gateway and notifier
//! - `config` - Layered configuration
//! - `telemetry` - Tracing subscriber setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
