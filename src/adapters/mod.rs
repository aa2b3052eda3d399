//! Adapters - concrete implementations of the ports.
//!
//! # Module Organization
//!
//! - `events` - In-memory event bus (observer list)
//! - `audit` - Tracing-backed intervention audit log

pub mod audit;
pub mod events;
