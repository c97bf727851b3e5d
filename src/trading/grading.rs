//! Weighted trade grading.
//!
//! Four independent scorers each return a [`GradeComponent`] (score, factors,
//! improvements). [`GradingEngine::grade`] only weights them and assembles the
//! narrative; no scorer knows about the others.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::core::mindset::mindset_balance;
use crate::models::{LetterGrade, MindsetTag, MindsetTagType, TradeStatus};
use crate::trading::trade::Trade;

pub const RISK_WEIGHT: f64 = 0.35;
pub const ALIGNMENT_WEIGHT: f64 = 0.30;
pub const MINDSET_WEIGHT: f64 = 0.25;
pub const EXECUTION_WEIGHT: f64 = 0.10;

/// Sub-scores below this always carry at least one improvement.
pub const GOOD_SCORE: f64 = 70.0;

const NEUTRAL_SCORE: f64 = 50.0;
/// Open trades have no outcome yet; they neither gain nor lose execution points.
const OPEN_EXECUTION_SCORE: f64 = 70.0;
const BREAKEVEN_EXECUTION_SCORE: f64 = 65.0;
/// Risk at or below this fraction of the limit scores a full 100.
const CONSERVATIVE_RISK_RATIO: f64 = 0.25;
const AT_LIMIT_RISK_SCORE: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeComponent {
    pub score: f64,
    pub weight: f64,
    pub factors: Vec<String>,
    pub improvements: Vec<String>,
}

impl GradeComponent {
    fn new(score: f64, weight: f64) -> Self {
        Self {
            score: round2(score.clamp(0.0, 100.0)),
            weight,
            factors: Vec::new(),
            improvements: Vec::new(),
        }
    }

    fn needs_work(&self) -> bool {
        self.score < GOOD_SCORE
    }

    fn ensure_improvement(&mut self, fallback: &str) {
        if self.needs_work() && self.improvements.is_empty() {
            self.improvements.push(fallback.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    pub risk_management: GradeComponent,
    pub method_alignment: GradeComponent,
    pub mindset_quality: GradeComponent,
    pub execution: GradeComponent,
}

impl GradeBreakdown {
    /// Components paired with their display names, in fixed order.
    pub fn components(&self) -> [(&'static str, &GradeComponent); 4] {
        [
            ("Risk management", &self.risk_management),
            ("Method alignment", &self.method_alignment),
            ("Mindset quality", &self.mindset_quality),
            ("Execution", &self.execution),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeGrade {
    pub trade_id: u64,
    pub overall: LetterGrade,
    pub score: f64,
    pub breakdown: GradeBreakdown,
    pub explanation: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GradingEngine {
    pub max_trade_risk_pct: f64,
}

impl Default for GradingEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl GradingEngine {
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_trade_risk_pct: cfg.max_trade_risk_pct,
        }
    }

    pub fn grade(&self, trade: &Trade) -> TradeGrade {
        let breakdown = GradeBreakdown {
            risk_management: score_risk(trade, self.max_trade_risk_pct),
            method_alignment: score_alignment(trade),
            mindset_quality: score_mindset(&trade.mindset_tags),
            execution: score_execution(trade),
        };

        let score = round2(
            breakdown
                .components()
                .iter()
                .map(|(_, c)| c.score * c.weight)
                .sum(),
        );
        let overall = LetterGrade::from_score(score);

        let explanation = explain(overall, score, &breakdown);
        let recommendations = recommend(&breakdown);

        debug!(
            "Trade {} graded {} ({:.2}) risk={:.0} align={:.0} mindset={:.0} exec={:.0}",
            trade.id,
            overall,
            score,
            breakdown.risk_management.score,
            breakdown.method_alignment.score,
            breakdown.mindset_quality.score,
            breakdown.execution.score
        );

        TradeGrade {
            trade_id: trade.id,
            overall,
            score,
            breakdown,
            explanation,
            recommendations,
        }
    }
}

pub fn score_risk(trade: &Trade, max_trade_risk_pct: f64) -> GradeComponent {
    let pct = trade.risk_percentage.abs();

    if !pct.is_finite() {
        let mut c = GradeComponent::new(0.0, RISK_WEIGHT);
        c.factors
            .push("Risk could not be measured against current equity".to_string());
        c.improvements
            .push("Record your account equity so every trade's risk can be checked".to_string());
        return c;
    }

    let ratio = pct / max_trade_risk_pct;
    let score = if ratio <= CONSERVATIVE_RISK_RATIO {
        100.0
    } else if ratio <= 1.0 {
        100.0 - (ratio - CONSERVATIVE_RISK_RATIO) / (1.0 - CONSERVATIVE_RISK_RATIO)
            * (100.0 - AT_LIMIT_RISK_SCORE)
    } else {
        (AT_LIMIT_RISK_SCORE - (ratio - 1.0) * AT_LIMIT_RISK_SCORE).max(0.0)
    };

    let mut c = GradeComponent::new(score, RISK_WEIGHT);
    c.factors.push(format!(
        "Risked {:.2}% of equity against a {:.1}% limit",
        pct, max_trade_risk_pct
    ));
    if ratio <= 0.5 {
        c.factors.push("Position sized conservatively".to_string());
    }
    if ratio > 1.0 {
        c.factors.push(format!(
            "Exceeded the {:.1}% per-trade risk limit",
            max_trade_risk_pct
        ));
        c.improvements.push(format!(
            "Cut position size so the stop-out loss stays under {:.1}% of equity",
            max_trade_risk_pct
        ));
    } else if c.needs_work() {
        c.improvements.push(format!(
            "Aim to risk {:.1}% of equity or less so one loss cannot hurt the account",
            max_trade_risk_pct / 2.0
        ));
    }
    c.ensure_improvement("Tighten position sizing relative to your stop distance");
    c
}

pub fn score_alignment(trade: &Trade) -> GradeComponent {
    let analysis = match &trade.alignment {
        Some(a) => a,
        None => {
            let mut c = GradeComponent::new(NEUTRAL_SCORE, ALIGNMENT_WEIGHT);
            c.factors.push("No method analysis recorded".to_string());
            c.improvements.push(
                "Record your analysis on at least two timeframes before entering".to_string(),
            );
            return c;
        }
    };

    let mut c = GradeComponent::new((analysis.overall_score + 1.0) * 50.0, ALIGNMENT_WEIGHT);
    c.factors.push(format!(
        "Alignment {} (score {:+.2})",
        analysis.alignment_level, analysis.overall_score
    ));
    if !analysis.confirmations.is_empty() {
        c.factors.push(format!(
            "{} of {} timeframes confirmed the trade",
            analysis.confirmations.len(),
            analysis.timeframe_breakdown.len()
        ));
    }
    if !analysis.warnings.is_empty() {
        c.factors.push(format!(
            "{} timeframe(s) argued against the trade",
            analysis.warnings.len()
        ));
    }

    if c.needs_work() {
        c.improvements.push(
            "Wait until your higher-timeframe analysis agrees with the trade direction"
                .to_string(),
        );
        if let Some(first) = analysis.warnings.first() {
            c.improvements.push(format!("Revisit the conflict: {}", first));
        }
    }
    c
}

pub fn score_mindset(tags: &[MindsetTag]) -> GradeComponent {
    let balance = match mindset_balance(tags) {
        Some(b) => b,
        None => {
            let mut c = GradeComponent::new(NEUTRAL_SCORE, MINDSET_WEIGHT);
            c.factors.push("No mindset tags recorded".to_string());
            c.improvements
                .push("Tag how you felt when entering so patterns become visible".to_string());
            return c;
        }
    };

    let mut c = GradeComponent::new(NEUTRAL_SCORE + NEUTRAL_SCORE * balance, MINDSET_WEIGHT);
    for t in tags {
        let kind = if t.tag.is_constructive() {
            "Constructive"
        } else {
            "Detrimental"
        };
        c.factors
            .push(format!("{}: {} ({})", kind, t.tag, t.intensity));
    }
    for t in tags.iter().filter(|t| !t.tag.is_constructive()) {
        c.improvements.push(mindset_advice(t.tag).to_string());
    }
    c.ensure_improvement("Only trade when you feel calm, focused and prepared");
    c
}

fn mindset_advice(tag: MindsetTagType) -> &'static str {
    match tag {
        MindsetTagType::Anxious => "Reduce size until the position no longer makes you anxious",
        MindsetTagType::Uncertain => "Skip setups you cannot explain in one sentence",
        MindsetTagType::Impulsive => "Run a pre-trade checklist to stop impulsive entries",
        MindsetTagType::Fearful => "Define the worst case before entry so fear does not drive exits",
        MindsetTagType::Greedy => "Set the target before entry and do not move it further out",
        MindsetTagType::Frustrated => "Step away after a loss before taking the next trade",
        MindsetTagType::Overconfident => "Keep size constant after winning streaks",
        MindsetTagType::Distracted => "Trade only when you can watch the position",
        MindsetTagType::Revengeful => "Stop trading for the day after a loss you want to win back",
        _ => "Keep journaling your state of mind before each trade",
    }
}

pub fn score_execution(trade: &Trade) -> GradeComponent {
    if trade.status != TradeStatus::Closed {
        let mut c = GradeComponent::new(OPEN_EXECUTION_SCORE, EXECUTION_WEIGHT);
        c.factors
            .push("Trade still open; execution not graded yet".to_string());
        return c;
    }

    let pnl = trade.realized_pnl.unwrap_or(0.0);

    if pnl == 0.0 {
        let mut c = GradeComponent::new(BREAKEVEN_EXECUTION_SCORE, EXECUTION_WEIGHT);
        c.factors.push("Closed at breakeven".to_string());
        c.improvements.push(
            "Let the trade work toward its planned target before scratching it".to_string(),
        );
        return c;
    }

    if pnl > 0.0 {
        return score_winner(trade);
    }

    let loss = -pnl;
    if trade.risk_amount <= 0.0 {
        let mut c = GradeComponent::new(40.0, EXECUTION_WEIGHT);
        c.factors
            .push("Closed at a loss with no protective stop risk defined".to_string());
        c.improvements
            .push("Place a protective stop on every trade before entry".to_string());
        return c;
    }

    let overshoot = loss / trade.risk_amount;
    if overshoot <= 1.0 + 1e-9 {
        let mut c = GradeComponent::new(GOOD_SCORE, EXECUTION_WEIGHT);
        c.factors.push(format!(
            "Loss of ${:.2} stayed within planned risk (stop respected)",
            loss
        ));
        return c;
    }

    let mut c = GradeComponent::new(
        (GOOD_SCORE - (overshoot - 1.0) * 60.0).max(10.0),
        EXECUTION_WEIGHT,
    );
    c.factors.push(format!(
        "Loss exceeded planned risk by {:.0}%",
        (overshoot - 1.0) * 100.0
    ));
    c.improvements
        .push("Honor the stop: exit at the planned level instead of hoping".to_string());
    c
}

fn score_winner(trade: &Trade) -> GradeComponent {
    let sign = trade.direction.sign();
    let captured = trade
        .exit_price
        .map(|exit| (exit - trade.entry_price) * sign)
        .unwrap_or(0.0);

    let planned = trade
        .target_price
        .map(|target| (target - trade.entry_price) * sign)
        .filter(|d| *d > 0.0);

    if let Some(planned) = planned {
        let capture = (captured / planned).max(0.0);
        let mut c = GradeComponent::new(70.0 + 30.0 * capture.min(1.0), EXECUTION_WEIGHT);
        if capture >= 1.0 {
            c.factors.push("Reached the planned target".to_string());
        } else {
            c.factors.push(format!(
                "Captured {:.0}% of the move to the planned target",
                capture * 100.0
            ));
            if capture < 0.5 {
                c.improvements
                    .push("Trail the stop instead of exiting early on winners".to_string());
            }
        }
        return c;
    }

    match trade.r_multiple() {
        Some(r) => {
            let mut c = GradeComponent::new(80.0 + 10.0 * r.min(2.0), EXECUTION_WEIGHT);
            c.factors.push(format!("Closed for {:.2}R", r));
            if r < 1.0 {
                c.improvements
                    .push("Hold winners until they pay at least 1R".to_string());
            }
            c
        }
        None => {
            let mut c = GradeComponent::new(85.0, EXECUTION_WEIGHT);
            c.factors.push("Closed with a profit".to_string());
            c
        }
    }
}

fn explain(overall: LetterGrade, score: f64, breakdown: &GradeBreakdown) -> Vec<String> {
    let mut lines = vec![format!("Overall grade {} ({:.2}/100)", overall, score)];

    let mut ranked: Vec<(&str, &GradeComponent)> = breakdown.components().to_vec();
    ranked.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));

    for (name, c) in ranked {
        let mut line = format!(
            "{}: {:.0}/100 ({:.0}% weight)",
            name,
            c.score,
            c.weight * 100.0
        );
        if !c.factors.is_empty() {
            line.push_str(&format!(". {}", c.factors.join("; ")));
        }
        lines.push(line);
    }
    lines
}

/// Improvements from every weak component, weakest first.
fn recommend(breakdown: &GradeBreakdown) -> Vec<String> {
    let mut weak: Vec<&GradeComponent> = breakdown
        .components()
        .iter()
        .map(|(_, c)| *c)
        .filter(|c| c.needs_work())
        .collect();
    weak.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut out: Vec<String> = Vec::new();
    for c in weak {
        for item in &c.improvements {
            if !out.contains(item) {
                out.push(item.clone());
            }
        }
    }

    if out.is_empty() {
        // Secondary suggestions from strong-but-imperfect components.
        for (_, c) in breakdown.components() {
            out.extend(c.improvements.iter().cloned());
        }
    }
    if out.is_empty() {
        out.push("Keep following your plan: every part of this trade met the standard".to_string());
    }
    out
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Divergence, Intensity, Signal, Timeframe};
    use crate::test_helpers::{constructive_tags, make_long, obs, ts};

    fn model_trade() -> Trade {
        let mut t = make_long(1, 100.0, 95.0, 100.0); // 0.5% risk
        t.replace_method_analysis(
            vec![obs(Timeframe::Daily, Signal::BuySignal, Divergence::Bullish)],
            ts(1),
        );
        t.replace_mindset_tags(constructive_tags(), ts(1));
        t.close(110.0, ts(2)).unwrap(); // +2R
        t
    }

    #[test]
    fn model_trade_grades_top_band() {
        let g = GradingEngine::default().grade(&model_trade());
        assert!(g.score > 80.0);
        assert!(matches!(
            g.overall,
            LetterGrade::APlus | LetterGrade::A | LetterGrade::AMinus | LetterGrade::BPlus | LetterGrade::B
        ));
        for (_, c) in g.breakdown.components() {
            assert!(c.score > 90.0);
        }
        assert_eq!(g.explanation[0], format!("Overall grade {} ({:.2}/100)", g.overall, g.score));
    }

    #[test]
    fn weights_sum_to_one() {
        let total = RISK_WEIGHT + ALIGNMENT_WEIGHT + MINDSET_WEIGHT + EXECUTION_WEIGHT;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn risk_score_bands() {
        let mut t = make_long(1, 100.0, 95.0, 100.0);
        t.risk_percentage = 0.5;
        assert!((score_risk(&t, 2.0).score - 100.0).abs() < 1e-9);
        t.risk_percentage = 2.0;
        assert!((score_risk(&t, 2.0).score - 40.0).abs() < 1e-9);
        t.risk_percentage = 4.0;
        assert_eq!(score_risk(&t, 2.0).score, 0.0);
        t.risk_percentage = f64::INFINITY;
        assert_eq!(score_risk(&t, 2.0).score, 0.0);
    }

    #[test]
    fn over_limit_risk_gets_improvement() {
        let mut t = make_long(1, 100.0, 95.0, 100.0);
        t.risk_percentage = 3.0;
        let c = score_risk(&t, 2.0);
        assert!(c.score < GOOD_SCORE);
        assert!(c.improvements[0].contains("Cut position size"));
    }

    #[test]
    fn alignment_remaps_linearly() {
        let mut t = make_long(1, 100.0, 95.0, 10.0);
        assert_eq!(score_alignment(&t).score, 50.0);
        t.replace_method_analysis(
            vec![obs(Timeframe::Daily, Signal::SellSignal, Divergence::Bearish)],
            ts(1),
        );
        let c = score_alignment(&t);
        assert_eq!(c.score, 0.0);
        assert!(c.improvements.iter().any(|s| s.starts_with("Revisit the conflict")));
    }

    #[test]
    fn mindset_scores_by_polarity_and_intensity() {
        assert_eq!(score_mindset(&[]).score, 50.0);
        let bad = score_mindset(&[MindsetTag::new(MindsetTagType::Impulsive, Intensity::High)]);
        assert_eq!(bad.score, 0.0);
        assert!(bad.improvements[0].contains("checklist"));
        let mild = score_mindset(&[MindsetTag::new(MindsetTagType::Calm, Intensity::Low)]);
        assert!((mild.score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn execution_defaults_and_outcomes() {
        let open = make_long(1, 100.0, 95.0, 10.0);
        assert_eq!(score_execution(&open).score, 70.0);

        let mut stopped = make_long(2, 100.0, 95.0, 10.0);
        stopped.close(95.0, ts(1)).unwrap();
        assert_eq!(score_execution(&stopped).score, 70.0);

        let mut blown = make_long(3, 100.0, 95.0, 10.0);
        blown.close(90.0, ts(1)).unwrap(); // 2x planned loss
        let c = score_execution(&blown);
        assert_eq!(c.score, 10.0);
        assert!(c.improvements[0].starts_with("Honor the stop"));

        let mut flat = make_long(4, 100.0, 95.0, 10.0);
        flat.close(100.0, ts(1)).unwrap();
        assert_eq!(score_execution(&flat).score, 65.0);
    }

    #[test]
    fn execution_uses_target_capture() {
        let mut t = make_long(1, 100.0, 95.0, 10.0).with_target(120.0);
        t.close(110.0, ts(1)).unwrap();
        assert!((score_execution(&t).score - 85.0).abs() < 1e-9);

        let mut hit = make_long(2, 100.0, 95.0, 10.0).with_target(120.0);
        hit.close(121.0, ts(1)).unwrap();
        assert_eq!(score_execution(&hit).score, 100.0);
    }

    #[test]
    fn weak_components_always_yield_recommendations() {
        let mut t = make_long(1, 100.0, 90.0, 300.0); // 3% risk
        t.replace_mindset_tags(
            vec![MindsetTag::new(MindsetTagType::Anxious, Intensity::Medium)],
            ts(1),
        );
        let g = GradingEngine::default().grade(&t);
        assert!(g.breakdown.risk_management.score < GOOD_SCORE);
        assert!(!g.recommendations.is_empty());
        // weakest first: mindset (12.5) before risk (20)
        assert!(g.recommendations[0].contains("anxious"));
    }

    #[test]
    fn grading_is_deterministic() {
        let t = model_trade();
        let engine = GradingEngine::default();
        assert_eq!(engine.grade(&t), engine.grade(&t));
    }
}
