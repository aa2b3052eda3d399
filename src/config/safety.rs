//! Safety detection configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::domain::safety::{SafetyPolicy, Sensitivity};

use super::error::ValidationError;

fn default_enable_crisis_detection() -> bool {
    true
}

fn default_cooldown_ms() -> u64 {
    30_000
}

fn default_recovery_high_ms() -> u64 {
    300_000
}

fn default_recovery_other_ms() -> u64 {
    120_000
}

/// Configuration for crisis detection and recovery timing.
#[derive(Debug, Clone, Deserialize)]
pub struct SafetyConfig {
    /// Whether keyword detection runs at all.
    #[serde(default = "default_enable_crisis_detection")]
    pub enable_crisis_detection: bool,

    /// Detection sensitivity (low/medium/high).
    #[serde(default)]
    pub sensitivity_level: Sensitivity,

    /// Minimum time between two accepted detections, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Recovery timer for a `high` crisis level, in milliseconds.
    #[serde(default = "default_recovery_high_ms")]
    pub recovery_high_ms: u64,

    /// Recovery timer for all other crisis levels, in milliseconds.
    #[serde(default = "default_recovery_other_ms")]
    pub recovery_other_ms: u64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            enable_crisis_detection: default_enable_crisis_detection(),
            sensitivity_level: Sensitivity::default(),
            cooldown_ms: default_cooldown_ms(),
            recovery_high_ms: default_recovery_high_ms(),
            recovery_other_ms: default_recovery_other_ms(),
        }
    }
}

impl SafetyConfig {
    /// Validates timer values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cooldown_ms == 0 {
            return Err(ValidationError::invalid_value(
                "safety.cooldown_ms",
                "must be greater than zero",
            ));
        }
        if self.recovery_high_ms == 0 {
            return Err(ValidationError::invalid_value(
                "safety.recovery_high_ms",
                "must be greater than zero",
            ));
        }
        if self.recovery_other_ms == 0 {
            return Err(ValidationError::invalid_value(
                "safety.recovery_other_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Converts this configuration into the per-session detection policy.
    pub fn policy(&self) -> SafetyPolicy {
        SafetyPolicy {
            detection_enabled: self.enable_crisis_detection,
            sensitivity: self.sensitivity_level,
            cooldown: Duration::from_millis(self.cooldown_ms),
            recovery_high: Duration::from_millis(self.recovery_high_ms),
            recovery_other: Duration::from_millis(self.recovery_other_ms),
        }
    }
}
