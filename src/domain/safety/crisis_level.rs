//! Crisis level - severity tier for a possible mental-health emergency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SafetyState;

/// Severity tier indicating likelihood of a mental-health emergency in
/// user-authored text.
///
/// Totally ordered: `None < Low < Medium < High`. A level returns to
/// `None` only through explicit reset, a manual safe override, or the
/// auto-recovery timer stepping it down one tier at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CrisisLevel {
    None,
    Low,
    Medium,
    High,
}

impl CrisisLevel {
    /// Returns the safety state this level forces, if any.
    ///
    /// Higher crisis forces a more guarded safety state; `Low` forces
    /// nothing, leaving the current state in place.
    pub fn forced_safety_state(&self) -> Option<SafetyState> {
        match self {
            CrisisLevel::High => Some(SafetyState::Concern),
            CrisisLevel::Medium => Some(SafetyState::Caution),
            CrisisLevel::Low => None,
            CrisisLevel::None => Some(SafetyState::Safe),
        }
    }

    /// Returns the level one tier down (High→Medium→Low→None).
    ///
    /// `None` has no further down-step and returns itself.
    pub fn step_down(&self) -> CrisisLevel {
        match self {
            CrisisLevel::High => CrisisLevel::Medium,
            CrisisLevel::Medium => CrisisLevel::Low,
            CrisisLevel::Low => CrisisLevel::None,
            CrisisLevel::None => CrisisLevel::None,
        }
    }

    /// Returns the safety state a session relaxes to when recovery lands
    /// on this level.
    ///
    /// `Low` keeps the session at `Caution` while still recovering; only a
    /// full recovery to `None` relaxes back to `Safe`.
    pub fn recovery_safety_state(&self) -> SafetyState {
        match self {
            CrisisLevel::High => SafetyState::Concern,
            CrisisLevel::Medium | CrisisLevel::Low => SafetyState::Caution,
            CrisisLevel::None => SafetyState::Safe,
        }
    }

    /// Returns true when no crisis is detected.
    pub fn is_none(&self) -> bool {
        matches!(self, CrisisLevel::None)
    }

    /// Returns the display label for this level.
    pub fn label(&self) -> &'static str {
        match self {
            CrisisLevel::None => "none",
            CrisisLevel::Low => "low",
            CrisisLevel::Medium => "medium",
            CrisisLevel::High => "high",
        }
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crisis_levels_are_totally_ordered() {
        assert!(CrisisLevel::None < CrisisLevel::Low);
        assert!(CrisisLevel::Low < CrisisLevel::Medium);
        assert!(CrisisLevel::Medium < CrisisLevel::High);
    }

    #[test]
    fn high_forces_concern() {
        assert_eq!(
            CrisisLevel::High.forced_safety_state(),
            Some(SafetyState::Concern)
        );
    }

    #[test]
    fn medium_forces_caution() {
        assert_eq!(
            CrisisLevel::Medium.forced_safety_state(),
            Some(SafetyState::Caution)
        );
    }

    #[test]
    fn low_forces_nothing() {
        assert_eq!(CrisisLevel::Low.forced_safety_state(), None);
    }

    #[test]
    fn none_forces_safe() {
        assert_eq!(
            CrisisLevel::None.forced_safety_state(),
            Some(SafetyState::Safe)
        );
    }

    #[test]
    fn step_down_walks_one_tier_at_a_time() {
        assert_eq!(CrisisLevel::High.step_down(), CrisisLevel::Medium);
        assert_eq!(CrisisLevel::Medium.step_down(), CrisisLevel::Low);
        assert_eq!(CrisisLevel::Low.step_down(), CrisisLevel::None);
        assert_eq!(CrisisLevel::None.step_down(), CrisisLevel::None);
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&CrisisLevel::High).unwrap(),
            "\"high\""
        );
        let level: CrisisLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, CrisisLevel::Medium);
    }
}
