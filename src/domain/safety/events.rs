//! Safety domain events.
//!
//! Events published when session safety changes occur:
//! - `CrisisDetected` - Content analysis matched crisis language
//! - `CrisisLevelChanged` - Crisis level moved (detection, override, recovery)
//! - `SafetyStateChanged` - UI-facing safety state moved
//!
//! The state machine publishes these instead of invoking presentation
//! callbacks, so policy stays decoupled from rendering.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp};

use super::{CrisisLevel, SafetyState};

/// What caused a crisis-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisLevelChangeCause {
    /// Keyword detection over user content.
    Detection,
    /// Manual override (user action or clinician tooling).
    Override,
    /// The auto-recovery timer stepped the level down one tier.
    Recovery,
    /// Session reset back to the initial state.
    Reset,
}

/// Published when content analysis matches crisis language.
///
/// Ephemeral: consumed by the UI layer and the audit trail, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisDetected {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Session the content belongs to.
    pub session_id: SessionId,

    /// The analyzed text.
    pub text: String,

    /// Keywords from the winning tier that matched.
    pub matched_keywords: Vec<String>,

    /// Detected severity after sensitivity adjustment.
    pub level: CrisisLevel,

    /// When the detection occurred.
    pub detected_at: Timestamp,
}

domain_event!(
    CrisisDetected,
    event_type = "safety.crisis_detected",
    aggregate_id = session_id,
    aggregate_type = "SafetySession",
    occurred_at = detected_at,
    event_id = event_id
);

/// Published when the session's crisis level moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisLevelChanged {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Session whose level changed.
    pub session_id: SessionId,

    /// Previous level.
    pub from: CrisisLevel,

    /// New level.
    pub to: CrisisLevel,

    /// What caused the change.
    pub cause: CrisisLevelChangeCause,

    /// When the change occurred.
    pub changed_at: Timestamp,
}

domain_event!(
    CrisisLevelChanged,
    event_type = "safety.crisis_level_changed",
    aggregate_id = session_id,
    aggregate_type = "SafetySession",
    occurred_at = changed_at,
    event_id = event_id
);

/// Published when the UI-facing safety state moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyStateChanged {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// Session whose state changed.
    pub session_id: SessionId,

    /// Previous state.
    pub from: SafetyState,

    /// New state.
    pub to: SafetyState,

    /// When the change occurred.
    pub changed_at: Timestamp,
}

domain_event!(
    SafetyStateChanged,
    event_type = "safety.state_changed",
    aggregate_id = session_id,
    aggregate_type = "SafetySession",
    occurred_at = changed_at,
    event_id = event_id
);

/// Union of the events a single session mutation can produce, in the
/// order they occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SafetyEvent {
    CrisisDetected(CrisisDetected),
    CrisisLevelChanged(CrisisLevelChanged),
    SafetyStateChanged(SafetyStateChanged),
}

impl SafetyEvent {
    /// Returns the routing event type for this event.
    pub fn event_type(&self) -> &'static str {
        use crate::domain::foundation::DomainEvent;
        match self {
            SafetyEvent::CrisisDetected(e) => e.event_type(),
            SafetyEvent::CrisisLevelChanged(e) => e.event_type(),
            SafetyEvent::SafetyStateChanged(e) => e.event_type(),
        }
    }

    /// Wraps this event in a transport envelope.
    pub fn to_envelope(&self) -> crate::domain::foundation::EventEnvelope {
        use crate::domain::foundation::EventEnvelope;
        match self {
            SafetyEvent::CrisisDetected(e) => EventEnvelope::from_event(e),
            SafetyEvent::CrisisLevelChanged(e) => EventEnvelope::from_event(e),
            SafetyEvent::SafetyStateChanged(e) => EventEnvelope::from_event(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainEvent;

    #[test]
    fn crisis_detected_implements_domain_event() {
        let session_id = SessionId::new();
        let event = CrisisDetected {
            event_id: EventId::new(),
            session_id,
            text: "I want to die".to_string(),
            matched_keywords: vec!["want to die".to_string()],
            level: CrisisLevel::High,
            detected_at: Timestamp::now(),
        };

        assert_eq!(event.event_type(), "safety.crisis_detected");
        assert_eq!(event.aggregate_id(), session_id.to_string());
        assert_eq!(event.aggregate_type(), "SafetySession");
    }

    #[test]
    fn safety_event_envelope_carries_payload() {
        let event = SafetyEvent::CrisisLevelChanged(CrisisLevelChanged {
            event_id: EventId::new(),
            session_id: SessionId::new(),
            from: CrisisLevel::None,
            to: CrisisLevel::High,
            cause: CrisisLevelChangeCause::Detection,
            changed_at: Timestamp::now(),
        });

        let envelope = event.to_envelope();
        assert_eq!(envelope.event_type, "safety.crisis_level_changed");
        assert_eq!(envelope.payload["to"], "high");
        assert_eq!(envelope.payload["cause"], "detection");
    }

    #[test]
    fn change_cause_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CrisisLevelChangeCause::Recovery).unwrap(),
            "\"recovery\""
        );
    }
}
