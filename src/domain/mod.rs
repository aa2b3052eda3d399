//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, events, errors)
//! - `safety` - Crisis detection and the safety-state machine
//! - `intervention` - Trauma-informed response tiers and audit records

pub mod foundation;
pub mod intervention;
pub mod safety;
