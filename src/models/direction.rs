use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }

    /// +1.0 for long, -1.0 for short. Flips a bullish bias into trade terms.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Some(Direction::Long),
            "SHORT" => Some(Direction::Short),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Active,
    Closed,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Active => write!(f, "ACTIVE"),
            TradeStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    Macd,
    Rsi,
    SupportResistance,
    MovingAverage,
    Stochastic,
    BollingerBands,
    Volume,
    Fibonacci,
    TrendLine,
    Other,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Macd => write!(f, "MACD"),
            Indicator::Rsi => write!(f, "RSI"),
            Indicator::SupportResistance => write!(f, "Support/Resistance"),
            Indicator::MovingAverage => write!(f, "Moving average"),
            Indicator::Stochastic => write!(f, "Stochastic"),
            Indicator::BollingerBands => write!(f, "Bollinger bands"),
            Indicator::Volume => write!(f, "Volume"),
            Indicator::Fibonacci => write!(f, "Fibonacci"),
            Indicator::TrendLine => write!(f, "Trend line"),
            Indicator::Other => write!(f, "Other indicator"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    BuySignal,
    SellSignal,
    Oversold,
    Overbought,
    Breakout,
    Breakdown,
    BullishCrossover,
    BearishCrossover,
    Support,
    Resistance,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::BuySignal => write!(f, "buy signal"),
            Signal::SellSignal => write!(f, "sell signal"),
            Signal::Oversold => write!(f, "oversold"),
            Signal::Overbought => write!(f, "overbought"),
            Signal::Breakout => write!(f, "breakout"),
            Signal::Breakdown => write!(f, "breakdown"),
            Signal::BullishCrossover => write!(f, "bullish crossover"),
            Signal::BearishCrossover => write!(f, "bearish crossover"),
            Signal::Support => write!(f, "holding support"),
            Signal::Resistance => write!(f, "at resistance"),
            Signal::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Divergence {
    Bullish,
    Bearish,
    None,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::Bullish => write!(f, "bullish divergence"),
            Divergence::Bearish => write!(f, "bearish divergence"),
            Divergence::None => write!(f, "no divergence"),
        }
    }
}

/// Ordered from worst to best so `Ord` compares alignment quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlignmentLevel {
    StrongConflict,
    WeakConflict,
    Neutral,
    WeakAlignment,
    StrongAlignment,
}

impl fmt::Display for AlignmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentLevel::StrongConflict => write!(f, "STRONG_CONFLICT"),
            AlignmentLevel::WeakConflict => write!(f, "WEAK_CONFLICT"),
            AlignmentLevel::Neutral => write!(f, "NEUTRAL"),
            AlignmentLevel::WeakAlignment => write!(f, "WEAK_ALIGNMENT"),
            AlignmentLevel::StrongAlignment => write!(f, "STRONG_ALIGNMENT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeframeVerdict {
    Aligned,
    Neutral,
    Conflicting,
}

impl fmt::Display for TimeframeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeframeVerdict::Aligned => write!(f, "ALIGNED"),
            TimeframeVerdict::Neutral => write!(f, "NEUTRAL"),
            TimeframeVerdict::Conflicting => write!(f, "CONFLICTING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MindsetTagType {
    Disciplined,
    Focused,
    Confident,
    Patient,
    Calm,
    Analytical,
    Anxious,
    Uncertain,
    Impulsive,
    Fearful,
    Greedy,
    Frustrated,
    Overconfident,
    Distracted,
    Revengeful,
}

impl fmt::Display for MindsetTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MindsetTagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MindsetTagType::Disciplined => "DISCIPLINED",
            MindsetTagType::Focused => "FOCUSED",
            MindsetTagType::Confident => "CONFIDENT",
            MindsetTagType::Patient => "PATIENT",
            MindsetTagType::Calm => "CALM",
            MindsetTagType::Analytical => "ANALYTICAL",
            MindsetTagType::Anxious => "ANXIOUS",
            MindsetTagType::Uncertain => "UNCERTAIN",
            MindsetTagType::Impulsive => "IMPULSIVE",
            MindsetTagType::Fearful => "FEARFUL",
            MindsetTagType::Greedy => "GREEDY",
            MindsetTagType::Frustrated => "FRUSTRATED",
            MindsetTagType::Overconfident => "OVERCONFIDENT",
            MindsetTagType::Distracted => "DISTRACTED",
            MindsetTagType::Revengeful => "REVENGEFUL",
        }
    }

    pub fn is_constructive(&self) -> bool {
        matches!(
            self,
            MindsetTagType::Disciplined
                | MindsetTagType::Focused
                | MindsetTagType::Confident
                | MindsetTagType::Patient
                | MindsetTagType::Calm
                | MindsetTagType::Analytical
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Low => write!(f, "low"),
            Intensity::Medium => write!(f, "medium"),
            Intensity::High => write!(f, "high"),
        }
    }
}

impl Intensity {
    pub fn weight(&self) -> f64 {
        match self {
            Intensity::Low => 0.5,
            Intensity::Medium => 0.75,
            Intensity::High => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Warning,
    Danger,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "SAFE"),
            RiskLevel::Warning => write!(f, "WARNING"),
            RiskLevel::Danger => write!(f, "DANGER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeReason {
    TradeClose,
    AnalysisUpdate,
    MindsetUpdate,
    ManualRecalc,
}

impl fmt::Display for GradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeReason::TradeClose => write!(f, "TRADE_CLOSE"),
            GradeReason::AnalysisUpdate => write!(f, "ANALYSIS_UPDATE"),
            GradeReason::MindsetUpdate => write!(f, "MINDSET_UPDATE"),
            GradeReason::ManualRecalc => write!(f, "MANUAL_RECALC"),
        }
    }
}

/// Letter grade, best first so a `BTreeMap` keyed by it lists A+ at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

/// Lower bound of each band, checked top-down.
const GRADE_BANDS: &[(f64, LetterGrade)] = &[
    (97.0, LetterGrade::APlus),
    (93.0, LetterGrade::A),
    (90.0, LetterGrade::AMinus),
    (87.0, LetterGrade::BPlus),
    (83.0, LetterGrade::B),
    (80.0, LetterGrade::BMinus),
    (77.0, LetterGrade::CPlus),
    (73.0, LetterGrade::C),
    (70.0, LetterGrade::CMinus),
    (67.0, LetterGrade::DPlus),
    (63.0, LetterGrade::D),
    (60.0, LetterGrade::DMinus),
];

impl LetterGrade {
    pub fn from_score(score: f64) -> LetterGrade {
        GRADE_BANDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, g)| *g)
            .unwrap_or(LetterGrade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_bands() {
        assert_eq!(LetterGrade::from_score(100.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(97.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(96.99), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(90.0), LetterGrade::AMinus);
        assert_eq!(LetterGrade::from_score(85.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_score(70.0), LetterGrade::CMinus);
        assert_eq!(LetterGrade::from_score(60.0), LetterGrade::DMinus);
        assert_eq!(LetterGrade::from_score(59.99), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(0.0), LetterGrade::F);
        assert_eq!(serde_json::to_string(&LetterGrade::BPlus).unwrap(), "\"B+\"");
    }

    #[test]
    fn direction_parses_loosely() {
        assert_eq!(Direction::from_str_loose("long"), Some(Direction::Long));
        assert_eq!(Direction::from_str_loose(" SHORT "), Some(Direction::Short));
        assert_eq!(Direction::from_str_loose("sideways"), None);
        assert_eq!(Direction::from_str_loose(""), None);
    }

    #[test]
    fn wire_names_match_host() {
        assert_eq!(serde_json::to_string(&Signal::BuySignal).unwrap(), "\"BUY_SIGNAL\"");
        assert_eq!(
            serde_json::to_string(&Indicator::SupportResistance).unwrap(),
            "\"SUPPORT_RESISTANCE\""
        );
        assert_eq!(
            serde_json::to_string(&AlignmentLevel::StrongConflict).unwrap(),
            "\"STRONG_CONFLICT\""
        );
        let reason: GradeReason = serde_json::from_str("\"MANUAL_RECALC\"").unwrap();
        assert_eq!(reason, GradeReason::ManualRecalc);
    }

    #[test]
    fn alignment_levels_are_ordered() {
        assert!(AlignmentLevel::StrongConflict < AlignmentLevel::WeakConflict);
        assert!(AlignmentLevel::Neutral < AlignmentLevel::WeakAlignment);
        assert!(AlignmentLevel::WeakAlignment < AlignmentLevel::StrongAlignment);
    }

    #[test]
    fn mindset_polarity() {
        assert!(MindsetTagType::Disciplined.is_constructive());
        assert!(MindsetTagType::Analytical.is_constructive());
        assert!(!MindsetTagType::Impulsive.is_constructive());
        assert!(!MindsetTagType::Anxious.is_constructive());
    }
}
