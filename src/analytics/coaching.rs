//! Grade trends and coaching built on recorded grades.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Config;
use crate::models::LetterGrade;
use crate::trading::grade_book::GradeHistoryEntry;
use crate::trading::grading::TradeGrade;

const TREND_BAND: f64 = 5.0;
const MIN_TREND_ENTRIES: usize = 4;
const HIGH_PRIORITY_BELOW: f64 = 50.0;
const MEDIUM_PRIORITY_BELOW: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAnalytics {
    pub total_graded: usize,
    pub average_grade: f64,
    pub average_letter: Option<LetterGrade>,
    pub best_score: f64,
    pub worst_score: f64,
    pub grade_distribution: BTreeMap<LetterGrade, usize>,
    pub reason_counts: BTreeMap<String, usize>,
    pub trend: GradeTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachingCategory {
    RiskManagement,
    MethodAlignment,
    MindsetQuality,
    Execution,
}

impl fmt::Display for CoachingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachingCategory::RiskManagement => write!(f, "RISK_MANAGEMENT"),
            CoachingCategory::MethodAlignment => write!(f, "METHOD_ALIGNMENT"),
            CoachingCategory::MindsetQuality => write!(f, "MINDSET_QUALITY"),
            CoachingCategory::Execution => write!(f, "EXECUTION"),
        }
    }
}

impl CoachingCategory {
    fn action_items(&self) -> Vec<String> {
        let items: &[&str] = match self {
            CoachingCategory::RiskManagement => &[
                "Size every position from the stop distance, not from conviction",
                "Keep per-trade risk at or below 1% of equity until scores recover",
                "Check total open risk before adding a new position",
            ],
            CoachingCategory::MethodAlignment => &[
                "Record analysis on at least three timeframes before entry",
                "Only take trades where the higher timeframes agree with the direction",
                "Treat divergence against your direction as a reason to wait",
            ],
            CoachingCategory::MindsetQuality => &[
                "Write down your state of mind before every entry",
                "Take a break after two consecutive losses",
                "Avoid trading when anxious, impulsive or frustrated",
            ],
            CoachingCategory::Execution => &[
                "Set stop and target before entering and leave them alone",
                "Exit at the stop without widening it",
                "Review exits weekly to see where profit was left behind",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingRecommendation {
    pub category: CoachingCategory,
    pub priority: Priority,
    pub average_score: f64,
    pub action_items: Vec<String>,
}

pub fn calculate_grade_analytics(grades_over_time: &[GradeHistoryEntry]) -> GradeAnalytics {
    let n = grades_over_time.len();
    let mut grade_distribution: BTreeMap<LetterGrade, usize> = BTreeMap::new();
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in grades_over_time {
        *grade_distribution.entry(entry.grade).or_default() += 1;
        *reason_counts.entry(entry.reason.to_string()).or_default() += 1;
    }

    if n == 0 {
        return GradeAnalytics {
            total_graded: 0,
            average_grade: 0.0,
            average_letter: None,
            best_score: 0.0,
            worst_score: 0.0,
            grade_distribution,
            reason_counts,
            trend: GradeTrend::Stable,
        };
    }

    let scores: Vec<f64> = grades_over_time.iter().map(|g| g.score).collect();
    let average_grade = round2(mean(&scores));

    GradeAnalytics {
        total_graded: n,
        average_grade,
        average_letter: Some(LetterGrade::from_score(average_grade)),
        best_score: scores.iter().cloned().fold(f64::MIN, f64::max),
        worst_score: scores.iter().cloned().fold(f64::MAX, f64::min),
        grade_distribution,
        reason_counts,
        trend: trend_of(&scores),
    }
}

/// Later half against earlier half, in chronological order.
fn trend_of(scores: &[f64]) -> GradeTrend {
    if scores.len() < MIN_TREND_ENTRIES {
        return GradeTrend::Stable;
    }
    let mid = scores.len() / 2;
    let delta = mean(&scores[mid..]) - mean(&scores[..mid]);
    if delta > TREND_BAND {
        GradeTrend::Improving
    } else if delta < -TREND_BAND {
        GradeTrend::Declining
    } else {
        GradeTrend::Stable
    }
}

pub struct Coach {
    pub window: usize,
    pub threshold: f64,
}

impl Default for Coach {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Coach {
    pub fn new(cfg: &Config) -> Self {
        Self {
            window: cfg.coaching_window,
            threshold: cfg.coaching_threshold,
        }
    }

    /// `recent_grades` is chronological; only the last `window` are inspected.
    pub fn generate_recommendations(&self, recent_grades: &[TradeGrade]) -> Vec<CoachingRecommendation> {
        if recent_grades.is_empty() {
            return Vec::new();
        }
        let start = recent_grades.len().saturating_sub(self.window.max(1));
        let window = &recent_grades[start..];

        let dimensions = [
            (
                CoachingCategory::RiskManagement,
                average(window, |g| g.breakdown.risk_management.score),
            ),
            (
                CoachingCategory::MethodAlignment,
                average(window, |g| g.breakdown.method_alignment.score),
            ),
            (
                CoachingCategory::MindsetQuality,
                average(window, |g| g.breakdown.mindset_quality.score),
            ),
            (
                CoachingCategory::Execution,
                average(window, |g| g.breakdown.execution.score),
            ),
        ];

        let mut out: Vec<CoachingRecommendation> = dimensions
            .iter()
            .filter(|(_, avg)| *avg < self.threshold)
            .map(|&(category, avg)| CoachingRecommendation {
                category,
                priority: priority_for(avg),
                average_score: round2(avg),
                action_items: category.action_items(),
            })
            .collect();
        // stable: ties keep category order
        out.sort_by_key(|r| r.priority);
        out
    }
}

fn priority_for(avg: f64) -> Priority {
    if avg < HIGH_PRIORITY_BELOW {
        Priority::High
    } else if avg < MEDIUM_PRIORITY_BELOW {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn average<F: Fn(&TradeGrade) -> f64>(grades: &[TradeGrade], f: F) -> f64 {
    let values: Vec<f64> = grades.iter().map(f).collect();
    mean(&values)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
