use chrono::{DateTime, Duration, Utc};
use trade_grader::models::{
    Direction, Divergence, Indicator, Intensity, MethodObservation, MindsetTag, MindsetTagType,
    Signal, Timeframe,
};
use trade_grader::trading::trade::Trade;

pub const EQUITY: f64 = 100_000.0;

pub fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
        + Duration::minutes(minutes)
}

pub fn long(id: u64, entry: f64, stop: f64, size: f64) -> Trade {
    Trade::open(id, "AAPL", Direction::Long, entry, size, stop, EQUITY, at(0))
}

pub fn short(id: u64, entry: f64, stop: f64, size: f64) -> Trade {
    Trade::open(id, "EURUSD", Direction::Short, entry, size, stop, EQUITY, at(0))
}

/// An ACTIVE long whose risk is exactly `risk_amount` dollars.
pub fn long_risking(id: u64, risk_amount: f64) -> Trade {
    long(id, 100.0, 99.0, risk_amount)
}

/// Closes a fresh long at a price that realizes `pnl`.
pub fn closed(id: u64, pnl: f64) -> Trade {
    let mut t = long(id, 100.0, 95.0, 10.0);
    t.close(100.0 + pnl / 10.0, at(30)).unwrap();
    t
}

pub fn observation(timeframe: Timeframe, signal: Signal, divergence: Divergence) -> MethodObservation {
    MethodObservation::new(timeframe, Indicator::Rsi, signal, divergence)
}

pub fn calm_and_disciplined() -> Vec<MindsetTag> {
    vec![
        MindsetTag::new(MindsetTagType::Calm, Intensity::High),
        MindsetTag::new(MindsetTagType::Disciplined, Intensity::High),
    ]
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
