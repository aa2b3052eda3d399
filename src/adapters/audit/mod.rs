//! Audit trail adapters.

mod tracing_log;

pub use tracing_log::TracingInterventionLog;
