//! Library error type.
//!
//! Only host-side misuse ends up here: unknown trades, mutations on closed
//! trades and bad configuration. End-user input problems are reported as
//! [`crate::models::Validation`] values instead.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JournalError {
    #[error("Trade not found: {trade_id}")]
    TradeNotFound { trade_id: u64 },

    #[error("Trade is closed: {trade_id}")]
    TradeClosed { trade_id: u64 },

    #[error("{0}")]
    Validation(String),

    #[error("invalid config value {key}: {reason}")]
    InvalidConfig { key: String, reason: String },
}
