use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::core::alignment::{self, AlignmentAnalysis};
use crate::core::mindset::validate_mindset_tags;
use crate::core::risk::{
    new_risk_percentage, realized_pnl, recalculate_trade_risk, trade_risk,
    validate_stop_loss_adjustment,
};
use crate::error::JournalError;
use crate::models::{Direction, MethodObservation, MindsetTag, TradeStatus, Validation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_direction")]
    pub direction: Direction,
    pub entry_price: f64,
    pub position_size: f64,
    pub stop_loss: f64,
    /// Planned take-profit, if the trader set one.
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    pub status: TradeStatus,
    pub risk_amount: f64,
    pub risk_percentage: f64,
    #[serde(default)]
    pub realized_pnl: Option<f64>,
    #[serde(default)]
    pub method_analysis: Vec<MethodObservation>,
    #[serde(default)]
    pub alignment: Option<AlignmentAnalysis>,
    #[serde(default)]
    pub mindset_tags: Vec<MindsetTag>,
    pub entered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Host records may carry any casing, or null.
fn deserialize_direction<'de, D>(deserializer: D) -> Result<Direction, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    alignment::parse_direction(raw.as_deref()).map_err(serde::de::Error::custom)
}

impl Trade {
    /// New ACTIVE trade with risk figures computed against `equity`.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        id: u64,
        symbol: impl Into<String>,
        direction: Direction,
        entry_price: f64,
        position_size: f64,
        stop_loss: f64,
        equity: f64,
        at: DateTime<Utc>,
    ) -> Self {
        let risk_amount = trade_risk(entry_price, stop_loss, position_size);
        Self {
            id,
            symbol: symbol.into(),
            direction,
            entry_price,
            position_size,
            stop_loss,
            target_price: None,
            exit_price: None,
            status: TradeStatus::Active,
            risk_amount,
            risk_percentage: new_risk_percentage(risk_amount, equity),
            realized_pnl: None,
            method_analysis: Vec::new(),
            alignment: None,
            mindset_tags: Vec::new(),
            entered_at: at,
            updated_at: at,
            closed_at: None,
        }
    }

    pub fn with_target(mut self, target_price: f64) -> Self {
        self.target_price = Some(target_price);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    fn ensure_active(&self) -> Result<(), JournalError> {
        if self.is_closed() {
            return Err(JournalError::TradeClosed { trade_id: self.id });
        }
        Ok(())
    }

    /// Moves the stop and recomputes risk. Rejected moves leave the trade untouched.
    pub fn adjust_stop_loss(
        &mut self,
        new_stop_loss: f64,
        equity: f64,
        at: DateTime<Utc>,
    ) -> Result<Validation, JournalError> {
        self.ensure_active()?;

        let validation = validate_stop_loss_adjustment(self, new_stop_loss);
        if !validation.is_valid {
            warn!(
                "Trade {} stop adjustment to {:.4} rejected: {}",
                self.id,
                new_stop_loss,
                validation.error_message()
            );
            return Ok(validation);
        }

        self.risk_amount = recalculate_trade_risk(self, new_stop_loss);
        self.risk_percentage = new_risk_percentage(self.risk_amount, equity);
        self.stop_loss = new_stop_loss;
        self.updated_at = at;
        debug!(
            "Trade {} stop -> {:.4}, risk ${:.2} ({:.2}%)",
            self.id, self.stop_loss, self.risk_amount, self.risk_percentage
        );
        Ok(validation)
    }

    /// Closes the trade at `exit_price`. Terminal: a second close is an error.
    pub fn close(&mut self, exit_price: f64, at: DateTime<Utc>) -> Result<Validation, JournalError> {
        self.ensure_active()?;

        if !exit_price.is_finite() || exit_price <= 0.0 {
            return Ok(Validation::fail("Exit price must be positive number"));
        }

        let pnl = realized_pnl(self.entry_price, exit_price, self.position_size, self.direction);
        self.exit_price = Some(exit_price);
        self.realized_pnl = Some(pnl);
        self.status = TradeStatus::Closed;
        self.closed_at = Some(at);
        self.updated_at = at;
        debug!("Trade {} closed @ {:.4}, PnL ${:+.2}", self.id, exit_price, pnl);
        Ok(Validation::ok())
    }

    /// Replaces the observation set wholesale and recomputes alignment.
    pub fn replace_method_analysis(
        &mut self,
        observations: Vec<MethodObservation>,
        at: DateTime<Utc>,
    ) -> Validation {
        match alignment::analyze(self.direction, &observations) {
            Ok(analysis) => {
                self.method_analysis = observations;
                self.alignment = Some(analysis);
                self.updated_at = at;
                Validation::ok()
            }
            Err(e) => {
                warn!("Trade {} method analysis rejected: {}", self.id, e);
                Validation::fail(e.to_string())
            }
        }
    }

    /// Recomputes alignment from the stored observations, e.g. after loading
    /// a trade whose host record carries observations but no analysis.
    pub fn refresh_alignment(&mut self) -> Validation {
        if self.method_analysis.is_empty() {
            self.alignment = None;
            return Validation::ok();
        }
        match alignment::analyze(self.direction, &self.method_analysis) {
            Ok(analysis) => {
                self.alignment = Some(analysis);
                Validation::ok()
            }
            Err(e) => Validation::fail(e.to_string()),
        }
    }

    pub fn replace_mindset_tags(&mut self, tags: Vec<MindsetTag>, at: DateTime<Utc>) -> Validation {
        let validation = validate_mindset_tags(&tags);
        if validation.is_valid {
            self.mindset_tags = tags;
            self.updated_at = at;
        } else {
            warn!(
                "Trade {} mindset tags rejected: {}",
                self.id,
                validation.error_message()
            );
        }
        validation
    }

    /// Realized reward in units of the risk taken, when both are known.
    pub fn r_multiple(&self) -> Option<f64> {
        match self.realized_pnl {
            Some(pnl) if self.risk_amount > 0.0 => Some(pnl / self.risk_amount),
            _ => None,
        }
    }
}
