use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Direction, RiskLevel, TradeStatus, Validation};
use crate::trading::trade::Trade;

/// Dollar loss if the stop is hit. Position size is taken by magnitude.
pub fn trade_risk(entry_price: f64, stop_loss: f64, position_size: f64) -> f64 {
    (entry_price - stop_loss).abs() * position_size.abs()
}

/// Open risk across a book. Closed trades never count.
pub fn portfolio_risk(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .filter(|t| t.status == TradeStatus::Active)
        .map(|t| t.risk_amount)
        .sum()
}

pub fn realized_pnl(
    entry_price: f64,
    exit_price: f64,
    position_size: f64,
    direction: Direction,
) -> f64 {
    match direction {
        Direction::Long => (exit_price - entry_price) * position_size,
        Direction::Short => (entry_price - exit_price) * position_size,
    }
}

pub fn update_equity(current_equity: f64, pnl: f64) -> f64 {
    current_equity + pnl
}

/// Stops may only move in the trade's favour: up for longs, down for shorts.
pub fn validate_stop_loss_adjustment(trade: &Trade, new_stop_loss: f64) -> Validation {
    if !new_stop_loss.is_finite() || new_stop_loss <= 0.0 {
        return Validation::fail("Stop loss must be positive number");
    }

    match trade.direction {
        Direction::Long if new_stop_loss <= trade.stop_loss => Validation::fail(
            "Stop loss for LONG trades must be higher than current stop loss",
        ),
        Direction::Short if new_stop_loss >= trade.stop_loss => Validation::fail(
            "Stop loss for SHORT trades must be lower than current stop loss",
        ),
        _ => Validation::ok(),
    }
}

pub fn recalculate_trade_risk(trade: &Trade, new_stop_loss: f64) -> f64 {
    trade_risk(trade.entry_price, new_stop_loss, trade.position_size)
}

/// Percent of equity at risk. Zero equity yields infinity (or NaN for zero
/// risk); both land in [`RiskLevel::Danger`].
pub fn new_risk_percentage(risk_amount: f64, equity: f64) -> f64 {
    risk_amount * 100.0 / equity
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRiskEntry {
    pub id: u64,
    pub symbol: String,
    pub risk_amount: f64,
    pub risk_percentage: f64,
    /// Above the per-trade limit on its own.
    pub exceeds_limit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRiskSummary {
    pub total_risk_amount: f64,
    pub total_risk_percentage: f64,
    pub exceeds_limit: bool,
    pub risk_level: RiskLevel,
    pub active_trades: Vec<TradeRiskEntry>,
}

/// Limit checks. Limits are percentages of equity; equality never breaches.
#[derive(Debug, Clone)]
pub struct RiskCalculator {
    pub max_trade_risk_pct: f64,
    pub max_portfolio_risk_pct: f64,
    pub portfolio_warning_pct: f64,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl RiskCalculator {
    pub fn new(cfg: &Config) -> Self {
        Self {
            max_trade_risk_pct: cfg.max_trade_risk_pct,
            max_portfolio_risk_pct: cfg.max_portfolio_risk_pct,
            portfolio_warning_pct: cfg.portfolio_warning_pct,
        }
    }

    pub fn exceeds_individual_limit(&self, risk_amount: f64, equity: f64) -> bool {
        // Scaled by 100 on both sides so whole-dollar boundaries compare exactly.
        risk_amount * 100.0 > equity * self.max_trade_risk_pct
    }

    pub fn exceeds_portfolio_limit(&self, portfolio_risk: f64, equity: f64) -> bool {
        portfolio_risk * 100.0 > equity * self.max_portfolio_risk_pct
    }

    pub fn risk_level(&self, total_risk_percentage: f64) -> RiskLevel {
        if total_risk_percentage <= self.portfolio_warning_pct {
            RiskLevel::Safe
        } else if total_risk_percentage <= self.max_portfolio_risk_pct {
            RiskLevel::Warning
        } else {
            RiskLevel::Danger
        }
    }

    pub fn detailed_portfolio_risk(&self, trades: &[Trade], equity: f64) -> PortfolioRiskSummary {
        let active: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.status == TradeStatus::Active)
            .collect();

        let total_risk_amount: f64 = active.iter().map(|t| t.risk_amount).sum();
        let total_risk_percentage = new_risk_percentage(total_risk_amount, equity);
        let exceeds_limit = self.exceeds_portfolio_limit(total_risk_amount, equity);
        let risk_level = self.risk_level(total_risk_percentage);

        let active_trades = active
            .iter()
            .map(|t| {
                let risk_percentage = new_risk_percentage(t.risk_amount, equity);
                let exceeds_limit = self.exceeds_individual_limit(t.risk_amount, equity);
                if exceeds_limit {
                    warn!(
                        "Trade {} ({}) risks {:.2}% of equity, above the {:.1}% per-trade limit",
                        t.id, t.symbol, risk_percentage, self.max_trade_risk_pct
                    );
                }
                TradeRiskEntry {
                    id: t.id,
                    symbol: t.symbol.clone(),
                    risk_amount: t.risk_amount,
                    risk_percentage,
                    exceeds_limit,
                }
            })
            .collect();

        if risk_level == RiskLevel::Danger {
            warn!(
                "Portfolio risk {:.2}% exceeds {:.1}% cap ({} active trades)",
                total_risk_percentage,
                self.max_portfolio_risk_pct,
                active.len()
            );
        } else {
            debug!(
                "Portfolio risk {:.2}% [{}] across {} active trades",
                total_risk_percentage,
                risk_level,
                active.len()
            );
        }

        PortfolioRiskSummary {
            total_risk_amount,
            total_risk_percentage,
            exceeds_limit,
            risk_level,
            active_trades,
        }
    }
}
