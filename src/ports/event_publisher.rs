//! EventPublisher port - Interface for publishing safety events.
//!
//! The state machine publishes its events without knowing about the
//! underlying transport mechanism (in-memory observers, a UI bridge, etc.).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing safety domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Errors are propagated to the caller; the caller decides whether
///   publishing failures may block the support flow (they must not)
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Delivery is best-effort sequential; a failure aborts the remainder.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

/// Handler for processing published events.
///
/// Implementations should be idempotent and quick; errors are isolated
/// per handler and never affect siblings.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
