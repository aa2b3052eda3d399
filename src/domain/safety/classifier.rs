//! Keyword classifier - fast local pre-filter for crisis language.
//!
//! Maps free text to a `CrisisLevel` via substring containment against
//! static, ordered keyword tiers. This is a deterministic pre-filter run on
//! every relevant user input; any server-side model classification happens
//! independently and does not replace it.

use serde::{Deserialize, Serialize};

use super::CrisisLevel;

/// Phrases indicating acute risk. A match here dominates every other tier.
pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "kill myself",
    "suicide",
    "suicidal",
    "want to die",
    "end my life",
    "end it all",
    "better off dead",
    "hurt myself",
    "self harm",
    "self-harm",
    "no reason to live",
];

/// Phrases indicating significant distress without acute-risk language.
pub const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "hopeless",
    "worthless",
    "can't go on",
    "cant go on",
    "give up",
    "no way out",
    "trapped",
    "unbearable",
    "hate myself",
    "falling apart",
    "panic attack",
];

/// Phrases indicating everyday strain.
pub const LOW_RISK_KEYWORDS: &[&str] = &[
    "stressed",
    "anxious",
    "overwhelmed",
    "struggling",
    "exhausted",
    "can't sleep",
    "cant sleep",
    "lonely",
    "worried",
];

/// Softer distress phrasings consulted only at high sensitivity.
///
/// This list is product policy pending clinical definition, not an
/// algorithmic artifact; treat additions and removals as policy changes.
pub const SOFT_CONCERN_KEYWORDS: &[&str] = &[
    "numb",
    "empty inside",
    "not okay",
    "tired of everything",
    "feel heavy",
    "disconnected",
];

/// Detection sensitivity, set by configuration.
///
/// Adjusts borderline results only; a high-risk match is reported as
/// `High` at every sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Downgrades a raw `Low` result to `None`.
    Low,
    /// Reports raw results unchanged.
    Medium,
    /// Upgrades a raw `None` result to `Low` when the soft-concern list matches.
    High,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Sensitivity::Medium
    }
}

/// Result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Detected severity after sensitivity adjustment.
    pub level: CrisisLevel,
    /// Keywords from the winning tier that matched.
    pub matched: Vec<&'static str>,
}

impl Classification {
    fn none() -> Self {
        Self {
            level: CrisisLevel::None,
            matched: Vec::new(),
        }
    }
}

/// Classifier over the static keyword tiers.
///
/// Pure and deterministic; no side effects, no external calls.
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Classifies text into a crisis level.
    ///
    /// Lower-cases the input, then checks the tiers in priority order
    /// high → medium → low; the first tier with a match wins, so high-risk
    /// keywords dominate even when lower-tier keywords also match.
    /// Sensitivity then adjusts borderline results (see [`Sensitivity`]).
    /// No matches at any tier yields `None`.
    pub fn classify(text: &str, sensitivity: Sensitivity) -> Classification {
        let lowered = text.to_lowercase();

        let raw = Self::match_tier(&lowered, HIGH_RISK_KEYWORDS, CrisisLevel::High)
            .or_else(|| Self::match_tier(&lowered, MEDIUM_RISK_KEYWORDS, CrisisLevel::Medium))
            .or_else(|| Self::match_tier(&lowered, LOW_RISK_KEYWORDS, CrisisLevel::Low))
            .unwrap_or_else(Classification::none);

        match (raw.level, sensitivity) {
            (CrisisLevel::Low, Sensitivity::Low) => Classification::none(),
            (CrisisLevel::None, Sensitivity::High) => {
                Self::match_tier(&lowered, SOFT_CONCERN_KEYWORDS, CrisisLevel::Low)
                    .unwrap_or(raw)
            }
            _ => raw,
        }
    }

    fn match_tier(
        lowered: &str,
        keywords: &'static [&'static str],
        level: CrisisLevel,
    ) -> Option<Classification> {
        let matched: Vec<&'static str> = keywords
            .iter()
            .filter(|kw| lowered.contains(*kw))
            .copied()
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(Classification { level, matched })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn high_risk_phrase_classifies_high() {
        let result = KeywordClassifier::classify("I want to die", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::High);
        assert!(result.matched.contains(&"want to die"));
    }

    #[test]
    fn low_risk_phrase_classifies_low() {
        let result = KeywordClassifier::classify("feeling a bit stressed", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::Low);
        assert_eq!(result.matched, vec!["stressed"]);
    }

    #[test]
    fn neutral_text_classifies_none() {
        let result = KeywordClassifier::classify("great day today", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::None);
        assert!(result.matched.is_empty());
    }

    #[test]
    fn classification_is_case_insensitive() {
        let result = KeywordClassifier::classify("I FEEL HOPELESS", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::Medium);
    }

    #[test]
    fn high_tier_dominates_when_lower_tiers_also_match() {
        let result = KeywordClassifier::classify(
            "stressed and hopeless, I want to die",
            Sensitivity::Medium,
        );
        assert_eq!(result.level, CrisisLevel::High);
        assert_eq!(result.matched, vec!["want to die"]);
    }

    #[test]
    fn medium_tier_dominates_low_tier() {
        let result =
            KeywordClassifier::classify("stressed and feeling trapped", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::Medium);
        assert!(result.matched.contains(&"trapped"));
    }

    #[test]
    fn low_sensitivity_downgrades_low_to_none() {
        let result = KeywordClassifier::classify("feeling a bit stressed", Sensitivity::Low);
        assert_eq!(result.level, CrisisLevel::None);
    }

    #[test]
    fn low_sensitivity_does_not_downgrade_medium() {
        let result = KeywordClassifier::classify("everything feels hopeless", Sensitivity::Low);
        assert_eq!(result.level, CrisisLevel::Medium);
    }

    #[test]
    fn high_sensitivity_upgrades_soft_concern_to_low() {
        let result = KeywordClassifier::classify("honestly just feel numb", Sensitivity::High);
        assert_eq!(result.level, CrisisLevel::Low);
        assert!(result.matched.contains(&"numb"));
    }

    #[test]
    fn high_sensitivity_leaves_plain_none_alone() {
        let result = KeywordClassifier::classify("great day today", Sensitivity::High);
        assert_eq!(result.level, CrisisLevel::None);
    }

    #[test]
    fn medium_sensitivity_ignores_soft_concern_list() {
        let result = KeywordClassifier::classify("honestly just feel numb", Sensitivity::Medium);
        assert_eq!(result.level, CrisisLevel::None);
    }

    #[test]
    fn empty_text_classifies_none() {
        let result = KeywordClassifier::classify("", Sensitivity::High);
        assert_eq!(result.level, CrisisLevel::None);
    }

    fn any_sensitivity() -> impl Strategy<Value = Sensitivity> {
        prop_oneof![
            Just(Sensitivity::Low),
            Just(Sensitivity::Medium),
            Just(Sensitivity::High),
        ]
    }

    proptest! {
        /// Any text containing a high-risk keyword classifies High at
        /// every sensitivity.
        #[test]
        fn high_risk_keyword_always_classifies_high(
            prefix in "[a-z ]{0,40}",
            idx in 0..HIGH_RISK_KEYWORDS.len(),
            suffix in "[a-z ]{0,40}",
            sensitivity in any_sensitivity(),
        ) {
            let text = format!("{} {} {}", prefix, HIGH_RISK_KEYWORDS[idx], suffix);
            let result = KeywordClassifier::classify(&text, sensitivity);
            prop_assert_eq!(result.level, CrisisLevel::High);
        }

        /// A bare low-risk keyword at low sensitivity never registers.
        #[test]
        fn low_risk_only_at_low_sensitivity_is_none(
            idx in 0..LOW_RISK_KEYWORDS.len(),
        ) {
            let result = KeywordClassifier::classify(LOW_RISK_KEYWORDS[idx], Sensitivity::Low);
            prop_assert_eq!(result.level, CrisisLevel::None);
        }

        /// Classification is deterministic.
        #[test]
        fn classify_is_deterministic(
            text in ".{0,80}",
            sensitivity in any_sensitivity(),
        ) {
            let a = KeywordClassifier::classify(&text, sensitivity);
            let b = KeywordClassifier::classify(&text, sensitivity);
            prop_assert_eq!(a, b);
        }
    }
}
