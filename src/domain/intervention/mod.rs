//! Intervention domain - trauma-informed response selection.
//!
//! # Module Organization
//!
//! - `dispatcher` - Severity tiers and the fixed response/resource tables
//! - `record` - Write-once audit entry for dispatched interventions

mod dispatcher;
mod record;

pub use dispatcher::{
    InterventionDispatcher, InterventionResponse, TreatmentSeverity, CRISIS_RESOURCES,
    MODERATE_RESOURCES, PROFESSIONAL_RESOURCES,
};
pub use record::InterventionRecord;
