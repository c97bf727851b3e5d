//! Multi-timeframe alignment scoring.
//!
//! Each observation gets a score in [-1, 1] from an explicit
//! (signal, divergence) bias table, flipped into the trade's direction. The
//! overall score is the plain mean across timeframes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::JournalError;
use crate::models::{
    AlignmentLevel, Direction, Divergence, Indicator, MethodObservation, Signal, Timeframe,
    TimeframeVerdict, Validation,
};

/// Bullish bias of each signal, before divergence.
const SIGNAL_BIAS: &[(Signal, f64)] = &[
    (Signal::BuySignal, 0.8),
    (Signal::BullishCrossover, 0.7),
    (Signal::Breakout, 0.7),
    (Signal::Oversold, 0.6),
    (Signal::Support, 0.5),
    (Signal::Neutral, 0.0),
    (Signal::Resistance, -0.5),
    (Signal::Overbought, -0.6),
    (Signal::Breakdown, -0.7),
    (Signal::BearishCrossover, -0.7),
    (Signal::SellSignal, -0.8),
];

const DIVERGENCE_BIAS: &[(Divergence, f64)] = &[
    (Divergence::Bullish, 0.2),
    (Divergence::None, 0.0),
    (Divergence::Bearish, -0.2),
];

const STRONG_THRESHOLD: f64 = 0.8;
const WEAK_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeScore {
    pub timeframe: Timeframe,
    pub score: f64,
    pub alignment: TimeframeVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentAnalysis {
    pub overall_score: f64,
    pub alignment_level: AlignmentLevel,
    pub warnings: Vec<String>,
    pub confirmations: Vec<String>,
    pub timeframe_breakdown: Vec<TimeframeScore>,
}

fn signal_bias(signal: Signal) -> f64 {
    SIGNAL_BIAS
        .iter()
        .find(|(s, _)| *s == signal)
        .map(|(_, b)| *b)
        .unwrap_or(0.0)
}

fn divergence_bias(divergence: Divergence) -> f64 {
    DIVERGENCE_BIAS
        .iter()
        .find(|(d, _)| *d == divergence)
        .map(|(_, b)| *b)
        .unwrap_or(0.0)
}

/// Agreement of a (signal, divergence) pair with a direction, in [-1, 1].
pub fn lookup_score(direction: Direction, signal: Signal, divergence: Divergence) -> f64 {
    if signal == Signal::Neutral {
        return 0.0;
    }
    let bullish = (signal_bias(signal) + divergence_bias(divergence)).clamp(-1.0, 1.0);
    round4(bullish * direction.sign())
}

pub fn observation_score(direction: Direction, obs: &MethodObservation) -> f64 {
    if obs.indicator == Indicator::Other {
        return 0.0;
    }
    lookup_score(direction, obs.signal, obs.divergence)
}

pub fn alignment_level(overall_score: f64) -> AlignmentLevel {
    if overall_score > STRONG_THRESHOLD {
        AlignmentLevel::StrongAlignment
    } else if overall_score > WEAK_THRESHOLD {
        AlignmentLevel::WeakAlignment
    } else if overall_score >= -WEAK_THRESHOLD {
        AlignmentLevel::Neutral
    } else if overall_score >= -STRONG_THRESHOLD {
        AlignmentLevel::WeakConflict
    } else {
        AlignmentLevel::StrongConflict
    }
}

pub fn parse_direction(raw: Option<&str>) -> Result<Direction, JournalError> {
    raw.and_then(Direction::from_str_loose)
        .ok_or_else(|| JournalError::Validation("Invalid or missing trade direction".to_string()))
}

pub fn validate_observations(observations: &[MethodObservation]) -> Validation {
    if observations.is_empty() {
        return Validation::fail("Method analysis is required");
    }
    let mut seen = HashSet::new();
    for obs in observations {
        if !seen.insert(obs.timeframe) {
            return Validation::fail("Duplicate timeframe analysis");
        }
    }
    Validation::ok()
}

pub fn analyze(
    direction: Direction,
    observations: &[MethodObservation],
) -> Result<AlignmentAnalysis, JournalError> {
    let validation = validate_observations(observations);
    if let Some(error) = validation.error {
        return Err(JournalError::Validation(error));
    }

    let mut warnings = Vec::new();
    let mut confirmations = Vec::new();
    let mut timeframe_breakdown = Vec::with_capacity(observations.len());

    for obs in observations {
        let score = observation_score(direction, obs);
        let verdict = if score > 0.0 {
            confirmations.push(describe(direction, obs, "supports"));
            TimeframeVerdict::Aligned
        } else if score < 0.0 {
            warnings.push(describe(direction, obs, "conflicts with"));
            TimeframeVerdict::Conflicting
        } else {
            TimeframeVerdict::Neutral
        };
        timeframe_breakdown.push(TimeframeScore {
            timeframe: obs.timeframe,
            score,
            alignment: verdict,
        });
    }

    let total: f64 = timeframe_breakdown.iter().map(|t| t.score).sum();
    let overall_score = round4(total / timeframe_breakdown.len() as f64);
    let level = alignment_level(overall_score);

    debug!(
        "Alignment {} score={:+.4} ({} confirmations, {} warnings)",
        level,
        overall_score,
        confirmations.len(),
        warnings.len()
    );

    Ok(AlignmentAnalysis {
        overall_score,
        alignment_level: level,
        warnings,
        confirmations,
        timeframe_breakdown,
    })
}

fn describe(direction: Direction, obs: &MethodObservation, verb: &str) -> String {
    let mut text = format!(
        "{} {} on the {} timeframe {} the {} trade",
        obs.indicator,
        obs.signal,
        obs.timeframe.label(),
        verb,
        direction.as_str().to_lowercase()
    );
    if obs.divergence != Divergence::None {
        text.push_str(&format!(" ({})", obs.divergence));
    }
    text
}

fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}
