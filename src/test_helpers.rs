use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Direction, Divergence, GradeReason, Indicator, Intensity, LetterGrade, MethodObservation,
    MindsetTag, MindsetTagType, Signal, Timeframe, TradeStatus,
};
use crate::trading::grade_book::GradeHistoryEntry;
use crate::trading::grading::{GradeBreakdown, GradeComponent, TradeGrade};
use crate::trading::trade::Trade;

pub const TEST_EQUITY: f64 = 100_000.0;

/// Fixed base time plus `minutes`.
pub fn ts(minutes: i64) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
        + Duration::minutes(minutes)
}

pub fn make_long(id: u64, entry: f64, stop: f64, size: f64) -> Trade {
    Trade::open(id, "AAPL", Direction::Long, entry, size, stop, TEST_EQUITY, ts(0))
}

pub fn make_short(id: u64, entry: f64, stop: f64, size: f64) -> Trade {
    Trade::open(id, "TSLA", Direction::Short, entry, size, stop, TEST_EQUITY, ts(0))
}

/// Closed long with an exact realized PnL; risk is $50.
pub fn closed_with_pnl(id: u64, pnl: f64) -> Trade {
    let mut t = make_long(id, 100.0, 95.0, 10.0);
    t.exit_price = Some(100.0 + pnl / 10.0);
    t.realized_pnl = Some(pnl);
    t.status = TradeStatus::Closed;
    t.closed_at = Some(ts(60));
    t
}

pub fn obs(timeframe: Timeframe, signal: Signal, divergence: Divergence) -> MethodObservation {
    MethodObservation::new(timeframe, Indicator::Macd, signal, divergence)
}

pub fn constructive_tags() -> Vec<MindsetTag> {
    vec![
        MindsetTag::new(MindsetTagType::Disciplined, Intensity::High),
        MindsetTag::new(MindsetTagType::Focused, Intensity::High),
        MindsetTag::new(MindsetTagType::Patient, Intensity::High),
    ]
}

fn component(score: f64, weight: f64) -> GradeComponent {
    GradeComponent {
        score,
        weight,
        factors: Vec::new(),
        improvements: Vec::new(),
    }
}

pub fn grade_with_scores(risk: f64, alignment: f64, mindset: f64, execution: f64) -> TradeGrade {
    let score = risk * 0.35 + alignment * 0.30 + mindset * 0.25 + execution * 0.10;
    TradeGrade {
        trade_id: 1,
        overall: LetterGrade::from_score(score),
        score,
        breakdown: GradeBreakdown {
            risk_management: component(risk, 0.35),
            method_alignment: component(alignment, 0.30),
            mindset_quality: component(mindset, 0.25),
            execution: component(execution, 0.10),
        },
        explanation: Vec::new(),
        recommendations: Vec::new(),
    }
}

pub fn history_entry(trade_id: u64, score: f64, reason: GradeReason) -> GradeHistoryEntry {
    GradeHistoryEntry {
        trade_id,
        grade: LetterGrade::from_score(score),
        score,
        reason,
        recorded_at: ts(trade_id as i64),
    }
}
