//! Tracing-backed intervention audit log.
//!
//! Emits each record as a structured `tracing` event; the host application
//! decides where those go (stdout, a collector, a file). This adapter
//! never fails, matching the fire-and-forget contract of the port.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::intervention::InterventionRecord;
use crate::ports::InterventionLog;

/// Audit log that writes records as structured tracing events under the
/// `haven::audit` target.
pub struct TracingInterventionLog;

impl TracingInterventionLog {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingInterventionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterventionLog for TracingInterventionLog {
    async fn record(&self, record: InterventionRecord) -> Result<(), DomainError> {
        info!(
            target: "haven::audit",
            session_id = %record.session_id,
            severity = %record.severity,
            response_type = %record.response_type,
            resources_provided = record.resources_provided,
            triggers = ?record.triggers,
            timestamp = %record.timestamp.as_unix_secs(),
            "intervention dispatched"
        );
        Ok(())
    }
}
