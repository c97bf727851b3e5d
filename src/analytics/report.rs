use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analytics::coaching::{calculate_grade_analytics, Coach, CoachingRecommendation, GradeAnalytics};
use crate::analytics::performance::{
    calculate_performance_statistics, PerformanceStatistics, SignificanceTester,
    StatisticalSignificance,
};
use crate::config::Config;
use crate::core::risk::{PortfolioRiskSummary, RiskCalculator};
use crate::models::GradeReason;
use crate::trading::grade_book::GradeBook;
use crate::trading::grading::{GradingEngine, TradeGrade};
use crate::trading::trade::Trade;

/// A trader's journal as handed over by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub equity: f64,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    pub generated_at: DateTime<Utc>,
    pub equity: f64,
    pub portfolio_risk: PortfolioRiskSummary,
    pub statistics: PerformanceStatistics,
    pub significance: StatisticalSignificance,
    pub grades: Vec<TradeGrade>,
    pub grade_analytics: GradeAnalytics,
    pub coaching: Vec<CoachingRecommendation>,
}

impl JournalReport {
    /// Grades every trade oldest first with a MANUAL_RECALC reason and
    /// aggregates the results. Hosts may list trades in any order.
    pub fn build(journal: &Journal, cfg: &Config, at: DateTime<Utc>) -> Self {
        let risk = RiskCalculator::new(cfg);
        let mut book = GradeBook::new(GradingEngine::new(cfg));

        let mut trades = journal.trades.clone();
        trades.sort_by_key(|t| (t.closed_at.unwrap_or(t.entered_at), t.id));
        for t in trades.iter_mut().filter(|t| t.alignment.is_none()) {
            let v = t.refresh_alignment();
            if !v.is_valid {
                warn!("Trade {} analysis skipped: {}", t.id, v.error_message());
            }
        }

        let grades: Vec<TradeGrade> = trades
            .iter()
            .map(|t| book.recalculate(t, GradeReason::ManualRecalc, at).clone())
            .collect();

        let report = JournalReport {
            generated_at: at,
            equity: journal.equity,
            portfolio_risk: risk.detailed_portfolio_risk(&trades, journal.equity),
            statistics: calculate_performance_statistics(&trades),
            significance: SignificanceTester::new(cfg).assess(&trades),
            grade_analytics: calculate_grade_analytics(book.history()),
            coaching: Coach::new(cfg).generate_recommendations(&grades),
            grades,
        };
        report.log_summary();
        report
    }

    pub fn log_summary(&self) {
        info!("{}", "=".repeat(60));
        info!("JOURNAL REPORT");
        info!("  Equity: ${:.2}", self.equity);
        info!(
            "  Open risk: ${:.2} ({:.2}%) [{}]",
            self.portfolio_risk.total_risk_amount,
            self.portfolio_risk.total_risk_percentage,
            self.portfolio_risk.risk_level
        );
        info!(
            "  Trades: {} closed / {} total | WR {:.1}% | PnL ${:+.2} | PF {:.2}",
            self.statistics.closed_trades,
            self.statistics.total_trades,
            self.statistics.win_rate,
            self.statistics.total_pnl,
            self.statistics.profit_factor
        );
        info!("  Significance: {}", self.significance.recommendation);
        if let Some(letter) = self.grade_analytics.average_letter {
            info!(
                "  Average grade: {} ({:.2})",
                letter, self.grade_analytics.average_grade
            );
        }
        for rec in &self.coaching {
            info!(
                "  Coaching [{:?}] {}: avg {:.1}",
                rec.priority, rec.category, rec.average_score
            );
        }
        info!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::coaching::{CoachingCategory, GradeTrend};
    use crate::models::{Divergence, RiskLevel, Signal, Timeframe};
    use crate::test_helpers::{closed_with_pnl, make_long, obs, ts};

    #[test]
    fn report_covers_every_trade() {
        let journal = Journal {
            equity: 100_000.0,
            trades: vec![
                make_long(1, 100.0, 95.0, 100.0),
                closed_with_pnl(2, 250.0),
                closed_with_pnl(3, -100.0),
            ],
        };
        let report = JournalReport::build(&journal, &Config::default(), ts(0));
        assert_eq!(report.grades.len(), 3);
        assert_eq!(report.grade_analytics.total_graded, 3);
        assert_eq!(report.statistics.closed_trades, 2);
        assert_eq!(report.portfolio_risk.active_trades.len(), 1);
        assert_eq!(report.portfolio_risk.risk_level, RiskLevel::Safe);
        assert!(!report.significance.is_significant);
    }

    #[test]
    fn missing_alignment_is_computed_from_observations() {
        let mut t = make_long(1, 100.0, 95.0, 100.0);
        t.method_analysis = vec![obs(Timeframe::Daily, Signal::BuySignal, Divergence::Bullish)];
        let journal = Journal {
            equity: 100_000.0,
            trades: vec![t],
        };
        let report = JournalReport::build(&journal, &Config::default(), ts(0));
        assert!((report.grades[0].breakdown.method_alignment.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn newest_first_journal_is_graded_chronologically() {
        // ids 11..=20 are the recent, conservatively sized trades
        let trades: Vec<Trade> = (1..=20u64)
            .rev()
            .map(|id| {
                let size = if id > 10 { 100.0 } else { 600.0 };
                let mut t = make_long(id, 100.0, 95.0, size);
                t.entered_at = ts(id as i64);
                t.updated_at = t.entered_at;
                t
            })
            .collect();
        let journal = Journal {
            equity: 100_000.0,
            trades,
        };

        let report = JournalReport::build(&journal, &Config::default(), ts(100));

        assert_eq!(report.grades.first().map(|g| g.trade_id), Some(1));
        assert_eq!(report.grades.last().map(|g| g.trade_id), Some(20));
        assert!(report
            .coaching
            .iter()
            .all(|r| r.category != CoachingCategory::RiskManagement));
        assert_eq!(report.grade_analytics.trend, GradeTrend::Improving);
    }

    #[test]
    fn close_time_orders_finished_trades() {
        let mut early_entry = closed_with_pnl(1, 100.0);
        early_entry.closed_at = Some(ts(500));
        let mut late_entry = closed_with_pnl(2, 100.0);
        late_entry.entered_at = ts(30);
        late_entry.closed_at = Some(ts(40));

        let journal = Journal {
            equity: 100_000.0,
            trades: vec![early_entry, late_entry],
        };
        let report = JournalReport::build(&journal, &Config::default(), ts(600));
        let ids: Vec<u64> = report.grades.iter().map(|g| g.trade_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn journal_round_trips_through_json() {
        let journal = Journal {
            equity: 50_000.0,
            trades: vec![make_long(1, 100.0, 95.0, 10.0)],
        };
        let json = serde_json::to_string(&journal).unwrap();
        assert!(json.contains("\"direction\":\"LONG\""));
        let back: Journal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trades[0].id, 1);
    }
}
