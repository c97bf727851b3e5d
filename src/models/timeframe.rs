use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart timeframe a method-analysis observation was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "ONE_HOUR")]
    H1,
    #[serde(rename = "FOUR_HOUR")]
    H4,
    #[serde(rename = "DAILY")]
    Daily,
    #[serde(rename = "WEEKLY")]
    Weekly,
    #[serde(rename = "MONTHLY")]
    Monthly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::H1 => "ONE_HOUR",
            Timeframe::H4 => "FOUR_HOUR",
            Timeframe::Daily => "DAILY",
            Timeframe::Weekly => "WEEKLY",
            Timeframe::Monthly => "MONTHLY",
        }
    }

    /// Lowercase label used in coaching text.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::H1 => "1-hour",
            Timeframe::H4 => "4-hour",
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Timeframe> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONE_HOUR" | "1H" => Some(Timeframe::H1),
            "FOUR_HOUR" | "4H" => Some(Timeframe::H4),
            "DAILY" | "1D" => Some(Timeframe::Daily),
            "WEEKLY" | "1W" => Some(Timeframe::Weekly),
            "MONTHLY" | "1M" => Some(Timeframe::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
