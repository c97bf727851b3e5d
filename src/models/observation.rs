use serde::{Deserialize, Serialize};

use crate::models::{Divergence, Indicator, Intensity, MindsetTagType, Signal, Timeframe};

/// One technical-analysis reading a trader recorded for a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodObservation {
    pub timeframe: Timeframe,
    pub indicator: Indicator,
    pub signal: Signal,
    #[serde(default = "default_divergence")]
    pub divergence: Divergence,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_divergence() -> Divergence {
    Divergence::None
}

impl MethodObservation {
    pub fn new(
        timeframe: Timeframe,
        indicator: Indicator,
        signal: Signal,
        divergence: Divergence,
    ) -> Self {
        Self {
            timeframe,
            indicator,
            signal,
            divergence,
            notes: None,
        }
    }
}

/// Self-reported psychological state attached to a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindsetTag {
    pub tag: MindsetTagType,
    pub intensity: Intensity,
}

impl MindsetTag {
    pub fn new(tag: MindsetTagType, intensity: Intensity) -> Self {
        Self { tag, intensity }
    }
}

/// Structured pre-condition result. Validators return this instead of failing,
/// so hosts can render the message next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}
