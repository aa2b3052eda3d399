//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, events, and error types
//! that form the vocabulary of the Haven safety domain.

mod errors;
mod events;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{SessionId, UserId};
pub use timestamp::Timestamp;
