//! Safety session - the combined safety-state / crisis-level machine.
//!
//! One `SafetySession` exists per app session. It owns the UI-facing
//! `SafetyState`, the detected `CrisisLevel`, and the safe-space flags, and
//! applies the one-way dominance rule between them: a higher crisis level
//! forces a more guarded safety state, while lowering the crisis level
//! relaxes the state only through explicit recovery.
//!
//! Mutations return the domain events they produced, in order; the
//! application layer publishes them and drives the recovery timer.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::foundation::{EventId, SessionId, Timestamp, ValidationError};

use super::{
    Classification, CrisisDetected, CrisisLevel, CrisisLevelChangeCause, CrisisLevelChanged,
    KeywordClassifier, SafetyEvent, SafetyState, SafetyStateChanged, Sensitivity,
};

/// Longest content accepted for analysis; anything larger is rejected at
/// the boundary rather than scanned.
const MAX_CONTENT_LEN: usize = 10_000;

/// Per-session detection policy, derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyPolicy {
    /// Whether keyword detection runs at all.
    pub detection_enabled: bool,
    /// Detection sensitivity for borderline results.
    pub sensitivity: Sensitivity,
    /// Minimum time between two accepted detection events.
    pub cooldown: Duration,
    /// Recovery timer while the level is `High`.
    pub recovery_high: Duration,
    /// Recovery timer for `Medium` and `Low`.
    pub recovery_other: Duration,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            detection_enabled: true,
            sensitivity: Sensitivity::Medium,
            cooldown: Duration::from_secs(30),
            recovery_high: Duration::from_secs(300),
            recovery_other: Duration::from_secs(120),
        }
    }
}

/// Read-only view of a session's safety tuple, for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySnapshot {
    pub safety_state: SafetyState,
    pub crisis_level: CrisisLevel,
    pub safe_space_active: bool,
    pub break_requested: bool,
}

/// Per-session safety state machine.
///
/// All operations are pure in-memory mutations; the only fallible edge is
/// input validation on `analyze_content`, and a rejected input leaves
/// state unchanged. Cooldown timing uses a monotonic clock read, never
/// wall-clock time.
#[derive(Debug, Clone)]
pub struct SafetySession {
    id: SessionId,
    policy: SafetyPolicy,
    safety_state: SafetyState,
    crisis_level: CrisisLevel,
    safe_space_active: bool,
    break_requested: bool,
    last_detection_at: Option<Instant>,
}

impl SafetySession {
    /// Creates a session in the initial state: `{Safe, None}` with the
    /// safe space active and no break requested.
    pub fn new(id: SessionId, policy: SafetyPolicy) -> Self {
        Self {
            id,
            policy,
            safety_state: SafetyState::Safe,
            crisis_level: CrisisLevel::None,
            safe_space_active: true,
            break_requested: false,
            last_detection_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn safety_state(&self) -> SafetyState {
        self.safety_state
    }

    pub fn crisis_level(&self) -> CrisisLevel {
        self.crisis_level
    }

    pub fn safe_space_active(&self) -> bool {
        self.safe_space_active
    }

    pub fn break_requested(&self) -> bool {
        self.break_requested
    }

    /// Returns the current safety tuple.
    pub fn snapshot(&self) -> SafetySnapshot {
        SafetySnapshot {
            safety_state: self.safety_state,
            crisis_level: self.crisis_level,
            safe_space_active: self.safe_space_active,
            break_requested: self.break_requested,
        }
    }

    /// Sets the crisis level by manual override, applying the dominance
    /// rule: High forces Concern, Medium forces Caution, None forces Safe,
    /// Low forces nothing.
    pub fn set_crisis_level(&mut self, level: CrisisLevel) -> Vec<SafetyEvent> {
        self.apply_crisis_level(level, CrisisLevelChangeCause::Override)
    }

    /// Sets the safety state directly.
    ///
    /// `Safe` is the manual all-clear and always wins over the current
    /// crisis reading, forcing the crisis level back to `None`. A guarded
    /// state never relaxes below the floor the current crisis level
    /// forces, preserving the High-implies-Concern invariant.
    pub fn set_safety_state(&mut self, state: SafetyState) -> Vec<SafetyEvent> {
        let mut events = Vec::new();

        if state == SafetyState::Safe {
            self.move_safety_state(SafetyState::Safe, &mut events);
            self.move_crisis_level(CrisisLevel::None, CrisisLevelChangeCause::Override, &mut events);
            return events;
        }

        let floor = self
            .crisis_level
            .forced_safety_state()
            .unwrap_or(SafetyState::Safe);
        self.move_safety_state(state.max(floor), &mut events);
        events
    }

    /// Runs keyword detection over user content.
    ///
    /// Blank or oversized input is rejected and leaves state unchanged.
    /// A call landing inside the cooldown window of the previous accepted
    /// detection is ignored, as is any call while detection is disabled.
    /// On a non-`None` result the crisis level is updated through the
    /// dominance rule and a `CrisisDetected` event is emitted along with
    /// any change events.
    pub fn analyze_content(&mut self, text: &str) -> Result<Vec<SafetyEvent>, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        if text.len() > MAX_CONTENT_LEN {
            return Err(ValidationError::too_long("text", MAX_CONTENT_LEN));
        }

        if !self.policy.detection_enabled {
            return Ok(Vec::new());
        }

        let now = Instant::now();
        if let Some(last) = self.last_detection_at {
            if now.duration_since(last) < self.policy.cooldown {
                return Ok(Vec::new());
            }
        }

        let Classification { level, matched } =
            KeywordClassifier::classify(text, self.policy.sensitivity);
        if level.is_none() {
            return Ok(Vec::new());
        }

        self.last_detection_at = Some(now);

        let mut events = vec![SafetyEvent::CrisisDetected(CrisisDetected {
            event_id: EventId::new(),
            session_id: self.id,
            text: text.to_string(),
            matched_keywords: matched.iter().map(|kw| kw.to_string()).collect(),
            level,
            detected_at: Timestamp::now(),
        })];
        events.extend(self.apply_crisis_level(level, CrisisLevelChangeCause::Detection));

        Ok(events)
    }

    /// Returns how long until the recovery timer should fire, or `None`
    /// when there is no crisis to recover from.
    pub fn recovery_delay(&self) -> Option<Duration> {
        match self.crisis_level {
            CrisisLevel::None => None,
            CrisisLevel::High => Some(self.policy.recovery_high),
            _ => Some(self.policy.recovery_other),
        }
    }

    /// Steps the crisis level down exactly one tier (High→Medium→Low→None)
    /// and relaxes the safety state to the new tier's guarded floor.
    ///
    /// Called by the recovery scheduler when the timer fires; a no-op at
    /// `None`.
    pub fn step_down_recovery(&mut self) -> Vec<SafetyEvent> {
        if self.crisis_level.is_none() {
            return Vec::new();
        }

        let next = self.crisis_level.step_down();
        let mut events = Vec::new();
        self.move_crisis_level(next, CrisisLevelChangeCause::Recovery, &mut events);
        self.move_safety_state(next.recovery_safety_state(), &mut events);
        events
    }

    /// Returns the session to the initial tuple:
    /// `{Safe, None, safe_space_active: true, break_requested: false}`.
    pub fn reset(&mut self) -> Vec<SafetyEvent> {
        let mut events = Vec::new();
        self.move_crisis_level(CrisisLevel::None, CrisisLevelChangeCause::Reset, &mut events);
        self.move_safety_state(SafetyState::Safe, &mut events);
        self.safe_space_active = true;
        self.break_requested = false;
        self.last_detection_at = None;
        events
    }

    /// Marks that the user asked for a break from the conversation.
    pub fn request_break(&mut self) {
        self.break_requested = true;
    }

    /// Clears a previously requested break.
    pub fn end_break(&mut self) {
        self.break_requested = false;
    }

    /// Toggles the safe-space indicator.
    pub fn set_safe_space(&mut self, active: bool) {
        self.safe_space_active = active;
    }

    fn apply_crisis_level(
        &mut self,
        level: CrisisLevel,
        cause: CrisisLevelChangeCause,
    ) -> Vec<SafetyEvent> {
        let mut events = Vec::new();
        self.move_crisis_level(level, cause, &mut events);
        if let Some(forced) = level.forced_safety_state() {
            self.move_safety_state(forced, &mut events);
        }
        events
    }

    fn move_crisis_level(
        &mut self,
        to: CrisisLevel,
        cause: CrisisLevelChangeCause,
        events: &mut Vec<SafetyEvent>,
    ) {
        if self.crisis_level == to {
            return;
        }
        events.push(SafetyEvent::CrisisLevelChanged(CrisisLevelChanged {
            event_id: EventId::new(),
            session_id: self.id,
            from: self.crisis_level,
            to,
            cause,
            changed_at: Timestamp::now(),
        }));
        self.crisis_level = to;
    }

    fn move_safety_state(&mut self, to: SafetyState, events: &mut Vec<SafetyEvent>) {
        if self.safety_state == to {
            return;
        }
        events.push(SafetyEvent::SafetyStateChanged(SafetyStateChanged {
            event_id: EventId::new(),
            session_id: self.id,
            from: self.safety_state,
            to,
            changed_at: Timestamp::now(),
        }));
        self.safety_state = to;
    }
}
