use serde::{Deserialize, Serialize};

use crate::error::JournalError;

/// Coaching never looks further back than this many graded trades.
pub const MAX_COACHING_WINDOW: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Risk limits (percent of equity)
    pub max_trade_risk_pct: f64,
    pub max_portfolio_risk_pct: f64,
    pub portfolio_warning_pct: f64,

    // Statistics
    pub significance_min_sample: usize,

    // Coaching
    pub coaching_window: usize,
    pub coaching_threshold: f64,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_trade_risk_pct: 2.0,
            max_portfolio_risk_pct: 6.0,
            portfolio_warning_pct: 4.5,
            significance_min_sample: 30,
            coaching_window: 10,
            coaching_threshold: 70.0,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let defaults = Config::default();

        Config {
            max_trade_risk_pct: env("MAX_TRADE_RISK_PCT", "2.0")
                .parse()
                .unwrap_or(defaults.max_trade_risk_pct),
            max_portfolio_risk_pct: env("MAX_PORTFOLIO_RISK_PCT", "6.0")
                .parse()
                .unwrap_or(defaults.max_portfolio_risk_pct),
            portfolio_warning_pct: env("PORTFOLIO_WARNING_PCT", "4.5")
                .parse()
                .unwrap_or(defaults.portfolio_warning_pct),
            significance_min_sample: env("SIGNIFICANCE_MIN_SAMPLE", "30")
                .parse()
                .unwrap_or(defaults.significance_min_sample),
            coaching_window: env("COACHING_WINDOW", "10")
                .parse()
                .unwrap_or(defaults.coaching_window),
            coaching_threshold: env("COACHING_THRESHOLD", "70")
                .parse()
                .unwrap_or(defaults.coaching_threshold),
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        let positive = [
            ("MAX_TRADE_RISK_PCT", self.max_trade_risk_pct),
            ("MAX_PORTFOLIO_RISK_PCT", self.max_portfolio_risk_pct),
            ("PORTFOLIO_WARNING_PCT", self.portfolio_warning_pct),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(JournalError::InvalidConfig {
                    key: key.to_string(),
                    reason: "must be a positive number".to_string(),
                });
            }
        }
        if self.portfolio_warning_pct > self.max_portfolio_risk_pct {
            return Err(JournalError::InvalidConfig {
                key: "PORTFOLIO_WARNING_PCT".to_string(),
                reason: "must not exceed MAX_PORTFOLIO_RISK_PCT".to_string(),
            });
        }
        if self.max_trade_risk_pct > self.max_portfolio_risk_pct {
            return Err(JournalError::InvalidConfig {
                key: "MAX_TRADE_RISK_PCT".to_string(),
                reason: "must not exceed MAX_PORTFOLIO_RISK_PCT".to_string(),
            });
        }
        if self.significance_min_sample == 0 {
            return Err(JournalError::InvalidConfig {
                key: "SIGNIFICANCE_MIN_SAMPLE".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.coaching_window == 0 || self.coaching_window > MAX_COACHING_WINDOW {
            return Err(JournalError::InvalidConfig {
                key: "COACHING_WINDOW".to_string(),
                reason: format!("must be between 1 and {}", MAX_COACHING_WINDOW),
            });
        }
        if !(0.0..=100.0).contains(&self.coaching_threshold) {
            return Err(JournalError::InvalidConfig {
                key: "COACHING_THRESHOLD".to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }
        Ok(())
    }
}
