//! Intervention record - write-once audit entry for dispatched responses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::{InterventionResponse, TreatmentSeverity};

/// Audit entry produced for every dispatched intervention.
///
/// Emitted fire-and-forget to the audit log; the safety core never depends
/// on the write succeeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionRecord {
    /// Session the intervention was dispatched for.
    pub session_id: SessionId,

    /// Severity tier of the dispatched response.
    pub severity: TreatmentSeverity,

    /// Keywords (or override markers) that triggered the intervention.
    pub triggers: Vec<String>,

    /// Routing label of the response template used.
    pub response_type: String,

    /// Whether resource lines were offered with the response.
    pub resources_provided: bool,

    /// When the intervention was dispatched.
    pub timestamp: Timestamp,
}

impl InterventionRecord {
    /// Builds the record for a dispatched response.
    pub fn for_dispatch(
        session_id: SessionId,
        severity: TreatmentSeverity,
        triggers: Vec<String>,
        response: &InterventionResponse,
    ) -> Self {
        Self {
            session_id,
            severity,
            triggers,
            response_type: format!("{}_support", severity.label()),
            resources_provided: !response.resources.is_empty(),
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intervention::InterventionDispatcher;

    #[test]
    fn record_captures_dispatch_outcome() {
        let response = InterventionDispatcher::dispatch(TreatmentSeverity::Crisis);
        let record = InterventionRecord::for_dispatch(
            SessionId::new(),
            TreatmentSeverity::Crisis,
            vec!["want to die".to_string()],
            &response,
        );

        assert_eq!(record.severity, TreatmentSeverity::Crisis);
        assert_eq!(record.response_type, "crisis_support");
        assert!(record.resources_provided);
        assert_eq!(record.triggers, vec!["want to die".to_string()]);
    }

    #[test]
    fn gentle_record_notes_no_resources() {
        let response = InterventionDispatcher::dispatch(TreatmentSeverity::Gentle);
        let record = InterventionRecord::for_dispatch(
            SessionId::new(),
            TreatmentSeverity::Gentle,
            Vec::new(),
            &response,
        );

        assert!(!record.resources_provided);
        assert_eq!(record.response_type, "gentle_support");
    }

    #[test]
    fn record_round_trips_through_json() {
        let response = InterventionDispatcher::dispatch(TreatmentSeverity::Moderate);
        let record = InterventionRecord::for_dispatch(
            SessionId::new(),
            TreatmentSeverity::Moderate,
            vec!["hopeless".to_string()],
            &response,
        );

        let json = serde_json::to_string(&record).unwrap();
        let restored: InterventionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }
}
