use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::TradeStatus;
use crate::trading::trade::Trade;

pub const CONFIDENCE_LEVEL: u32 = 95;
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStatistics {
    pub total_trades: usize,
    pub active_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub average_profit: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub payoff_ratio: f64,
    pub expectancy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSignificance {
    pub sample_size: usize,
    pub is_significant: bool,
    pub confidence_level: u32,
    pub win_rate: f64,
    /// Half-width of the 95% interval around the win rate, in percentage points.
    pub margin_of_error: f64,
    /// Distance of the observed win rate from a coin flip, in standard errors.
    pub z_score: f64,
    pub recommendation: String,
}

pub fn calculate_performance_statistics(trades: &[Trade]) -> PerformanceStatistics {
    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Closed)
        .collect();

    let mut winning = 0usize;
    let mut losing = 0usize;
    let mut breakeven = 0usize;
    let mut total_wins = 0.0_f64;
    let mut total_losses = 0.0_f64;
    let mut largest_win = 0.0_f64;
    let mut largest_loss = 0.0_f64;

    for t in &closed {
        let pnl = t.realized_pnl.unwrap_or(0.0);
        if pnl > 0.0 {
            winning += 1;
            total_wins += pnl;
            largest_win = largest_win.max(pnl);
        } else if pnl < 0.0 {
            losing += 1;
            total_losses += pnl.abs();
            largest_loss = largest_loss.max(pnl.abs());
        } else {
            breakeven += 1;
        }
    }

    let closed_count = closed.len();
    let win_rate = if closed_count > 0 {
        winning as f64 / closed_count as f64 * 100.0
    } else {
        0.0
    };

    let average_profit = if winning > 0 {
        total_wins / winning as f64
    } else {
        0.0
    };
    let average_loss = if losing > 0 {
        total_losses / losing as f64
    } else {
        0.0
    };

    let profit_factor = if total_losses > 0.0 {
        total_wins / total_losses
    } else {
        0.0
    };
    let payoff_ratio = if average_loss > 0.0 {
        average_profit / average_loss
    } else {
        0.0
    };

    let p = win_rate / 100.0;
    let expectancy = p * average_profit - (1.0 - p) * average_loss;

    let stats = PerformanceStatistics {
        total_trades: trades.len(),
        active_trades: trades.len() - closed_count,
        closed_trades: closed_count,
        winning_trades: winning,
        losing_trades: losing,
        breakeven_trades: breakeven,
        win_rate,
        total_pnl: total_wins - total_losses,
        average_profit,
        average_loss,
        largest_win,
        largest_loss,
        profit_factor,
        payoff_ratio,
        expectancy,
    };

    debug!(
        "Stats: {} closed, WR {:.1}%, PnL ${:+.2}, PF {:.2}, expectancy ${:+.2}",
        stats.closed_trades, stats.win_rate, stats.total_pnl, stats.profit_factor, stats.expectancy
    );
    stats
}

pub struct SignificanceTester {
    pub min_sample: usize,
}

impl Default for SignificanceTester {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl SignificanceTester {
    pub fn new(cfg: &Config) -> Self {
        Self {
            min_sample: cfg.significance_min_sample,
        }
    }

    /// Small samples degrade to a "need more trades" verdict rather than failing.
    pub fn assess(&self, trades: &[Trade]) -> StatisticalSignificance {
        let closed: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.status == TradeStatus::Closed)
            .collect();
        let n = closed.len();
        let wins = closed
            .iter()
            .filter(|t| t.realized_pnl.unwrap_or(0.0) > 0.0)
            .count();

        let p = if n > 0 { wins as f64 / n as f64 } else { 0.0 };
        let (margin_of_error, z_score) = if n > 0 {
            let nf = n as f64;
            (
                round2(Z_95 * (p * (1.0 - p) / nf).sqrt() * 100.0),
                round4((p - 0.5) / (0.25 / nf).sqrt()),
            )
        } else {
            (0.0, 0.0)
        };

        let is_significant = n >= self.min_sample;
        let recommendation = if is_significant {
            format!(
                "{} closed trades is enough to trust your {:.1}% win rate (±{:.1} points at {}% confidence)",
                n,
                p * 100.0,
                margin_of_error,
                CONFIDENCE_LEVEL
            )
        } else {
            format!(
                "Record {} more trades before drawing conclusions from your win rate",
                self.min_sample - n
            )
        };

        StatisticalSignificance {
            sample_size: n,
            is_significant,
            confidence_level: CONFIDENCE_LEVEL,
            win_rate: round2(p * 100.0),
            margin_of_error,
            z_score,
            recommendation,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{closed_with_pnl, make_long};

    #[test]
    fn empty_book_has_zero_stats() {
        let s = calculate_performance_statistics(&[]);
        assert_eq!(s.closed_trades, 0);
        assert_eq!(s.win_rate, 0.0);
        assert_eq!(s.profit_factor, 0.0);
        assert_eq!(s.expectancy, 0.0);
    }

    #[test]
    fn buckets_and_ratios() {
        let trades = vec![
            closed_with_pnl(1, 100.0),
            closed_with_pnl(2, -50.0),
            closed_with_pnl(3, 200.0),
            closed_with_pnl(4, 0.0),
            make_long(5, 100.0, 95.0, 10.0),
        ];
        let s = calculate_performance_statistics(&trades);
        assert_eq!(s.total_trades, 5);
        assert_eq!(s.active_trades, 1);
        assert_eq!(s.closed_trades, 4);
        assert_eq!(s.winning_trades, 2);
        assert_eq!(s.losing_trades, 1);
        assert_eq!(s.breakeven_trades, 1);
        assert!((s.win_rate - 50.0).abs() < 1e-9);
        assert!((s.total_pnl - 250.0).abs() < 1e-9);
        assert!((s.average_profit - 150.0).abs() < 1e-9);
        assert!((s.average_loss - 50.0).abs() < 1e-9);
        assert!((s.profit_factor - 6.0).abs() < 1e-9);
        assert!((s.payoff_ratio - 3.0).abs() < 1e-9);
        assert!((s.expectancy - 50.0).abs() < 1e-9);
        assert!((s.largest_win - 200.0).abs() < 1e-9);
        assert!((s.largest_loss - 50.0).abs() < 1e-9);
    }

    #[test]
    fn profit_factor_zero_without_losses() {
        let trades = vec![closed_with_pnl(1, 100.0), closed_with_pnl(2, 40.0)];
        let s = calculate_performance_statistics(&trades);
        assert_eq!(s.profit_factor, 0.0);
        assert!((s.win_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn closed_without_pnl_counts_as_breakeven() {
        let mut t = closed_with_pnl(1, 10.0);
        t.realized_pnl = None;
        let s = calculate_performance_statistics(&[t]);
        assert_eq!(s.breakeven_trades, 1);
    }

    #[test]
    fn significance_needs_thirty() {
        let tester = SignificanceTester::default();
        let trades: Vec<Trade> = (0..35)
            .map(|i| closed_with_pnl(i, if i % 2 == 0 { 100.0 } else { -100.0 }))
            .collect();
        let s = tester.assess(&trades);
        assert_eq!(s.sample_size, 35);
        assert!(s.is_significant);
        assert_eq!(s.confidence_level, 95);

        let one = tester.assess(&trades[..1]);
        assert!(!one.is_significant);
        assert!(one.recommendation.contains("29 more trades"));
    }

    #[test]
    fn significance_handles_empty() {
        let s = SignificanceTester::default().assess(&[]);
        assert_eq!(s.sample_size, 0);
        assert!(!s.is_significant);
        assert!(s.recommendation.contains("30 more trades"));
        assert_eq!(s.z_score, 0.0);
    }

    #[test]
    fn z_score_reflects_edge_over_coin_flip() {
        let trades: Vec<Trade> = (0..100)
            .map(|i| closed_with_pnl(i, if i < 60 { 10.0 } else { -10.0 }))
            .collect();
        let s = SignificanceTester::default().assess(&trades);
        assert!((s.z_score - 2.0).abs() < 1e-9);
        assert!((s.margin_of_error - 9.6).abs() < 1e-9);
    }
}
