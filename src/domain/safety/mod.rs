//! Safety domain - crisis detection and the safety-state machine.
//!
//! # Module Organization
//!
//! - `safety_state` / `crisis_level` - The two coupled status enums
//! - `classifier` - Keyword pre-filter over static tiers
//! - `session` - Per-session state machine (cooldown, recovery, reset)
//! - `events` - Domain events the machine publishes

mod classifier;
mod crisis_level;
mod events;
mod safety_state;
mod session;

pub use classifier::{
    Classification, KeywordClassifier, Sensitivity, HIGH_RISK_KEYWORDS, LOW_RISK_KEYWORDS,
    MEDIUM_RISK_KEYWORDS, SOFT_CONCERN_KEYWORDS,
};
pub use crisis_level::CrisisLevel;
pub use events::{
    CrisisDetected, CrisisLevelChangeCause, CrisisLevelChanged, SafetyEvent, SafetyStateChanged,
};
pub use safety_state::SafetyState;
pub use session::{SafetyPolicy, SafetySession, SafetySnapshot};
