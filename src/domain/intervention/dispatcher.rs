//! Intervention dispatcher - severity-tiered trauma-informed responses.
//!
//! A static lookup table, deliberately simple: the textual content is
//! policy, not algorithm. Response copy and resource lists change through
//! product review, never at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::safety::CrisisLevel;

/// Crisis hotline lines always included at the `Crisis` tier.
pub const CRISIS_RESOURCES: &[&str] = &[
    "988 Suicide & Crisis Lifeline: call or text 988",
    "Crisis Text Line: text HOME to 741741",
    "If you are in immediate danger, call 911",
];

/// Referral resources included at the `Professional` tier.
pub const PROFESSIONAL_RESOURCES: &[&str] = &[
    "SAMHSA National Helpline: 1-800-662-4357 (free, confidential, 24/7)",
    "Psychology Today therapist finder: psychologytoday.com/us/therapists",
];

/// Supportive resources for the `Moderate` tier.
pub const MODERATE_RESOURCES: &[&str] = &[
    "Grounding exercise: name 5 things you can see, 4 you can touch, 3 you can hear",
    "Crisis Text Line: text HOME to 741741 (if things get heavier)",
];

/// Response tier for a trauma-informed intervention.
///
/// Scales the response template to severity so the reply supports without
/// re-traumatizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentSeverity {
    Gentle,
    Moderate,
    Professional,
    Crisis,
}

impl TreatmentSeverity {
    /// Maps a detected crisis level to the response tier dispatched for it.
    ///
    /// `Professional` is not reachable from a single detection; it is the
    /// tier hosts select for sustained concern or explicit referral flows.
    pub fn from_crisis_level(level: CrisisLevel) -> Self {
        match level {
            CrisisLevel::None | CrisisLevel::Low => TreatmentSeverity::Gentle,
            CrisisLevel::Medium => TreatmentSeverity::Moderate,
            CrisisLevel::High => TreatmentSeverity::Crisis,
        }
    }

    /// Returns the display label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            TreatmentSeverity::Gentle => "gentle",
            TreatmentSeverity::Moderate => "moderate",
            TreatmentSeverity::Professional => "professional",
            TreatmentSeverity::Crisis => "crisis",
        }
    }
}

impl fmt::Display for TreatmentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The assembled intervention for one severity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionResponse {
    /// Supportive acknowledgment shown to the user.
    pub acknowledgment: String,
    /// Resource lines offered alongside the acknowledgment.
    pub resources: Vec<String>,
    /// Whether the tier calls for professional support.
    pub requires_professional: bool,
}

/// Dispatcher from severity tier to fixed response template.
pub struct InterventionDispatcher;

impl InterventionDispatcher {
    /// Selects the response for a severity tier.
    ///
    /// The `Crisis` tier always includes the crisis hotline and text line;
    /// `Professional` includes referral resources; lower tiers carry
    /// supportive text only.
    pub fn dispatch(severity: TreatmentSeverity) -> InterventionResponse {
        match severity {
            TreatmentSeverity::Gentle => InterventionResponse {
                acknowledgment: "Thank you for sharing that. Whatever you're feeling \
                    right now is okay, and you can take this at your own pace."
                    .to_string(),
                resources: Vec::new(),
                requires_professional: false,
            },
            TreatmentSeverity::Moderate => InterventionResponse {
                acknowledgment: "That sounds really heavy. You don't have to carry it \
                    alone - would it help to pause for a moment together?"
                    .to_string(),
                resources: to_strings(MODERATE_RESOURCES),
                requires_professional: false,
            },
            TreatmentSeverity::Professional => InterventionResponse {
                acknowledgment: "What you're describing deserves more support than this \
                    app can give. Talking with a professional could make a real \
                    difference, and reaching out is a strong step."
                    .to_string(),
                resources: to_strings(PROFESSIONAL_RESOURCES),
                requires_professional: true,
            },
            TreatmentSeverity::Crisis => InterventionResponse {
                acknowledgment: "I'm really glad you told me. You matter, and you \
                    deserve support right now - please reach out to one of these \
                    lines, they are there for exactly this moment."
                    .to_string(),
                resources: to_strings(CRISIS_RESOURCES),
                requires_professional: true,
            },
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
