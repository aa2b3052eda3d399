//! Safety state - coarse UI-facing mode gating supportive affordances.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse session mode (safe/caution/concern) that the UI reads to decide
/// which supportive affordances to show.
///
/// Constrained by `CrisisLevel` through a one-way dominance rule: a higher
/// crisis level forces a more guarded state, but lowering the crisis level
/// does not automatically relax the state outside of recovery.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SafetyState {
    Safe,
    Caution,
    Concern,
}

impl SafetyState {
    /// Returns the display label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            SafetyState::Safe => "safe",
            SafetyState::Caution => "caution",
            SafetyState::Concern => "concern",
        }
    }

    /// Returns true when the session is in the fully relaxed state.
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyState::Safe)
    }
}

impl fmt::Display for SafetyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
