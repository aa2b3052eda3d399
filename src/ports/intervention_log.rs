//! InterventionLog port - Interface for the intervention audit trail.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::intervention::InterventionRecord;

/// Port for recording dispatched interventions.
///
/// Invoked fire-and-forget: the safety core logs a warning on failure and
/// continues, because a stalled audit write must never block a support
/// flow.
#[async_trait]
pub trait InterventionLog: Send + Sync {
    /// Record a dispatched intervention. Write-once; no read path.
    async fn record(&self, record: InterventionRecord) -> Result<(), DomainError>;
}
