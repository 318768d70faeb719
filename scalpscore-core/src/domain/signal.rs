//! Signal output types: bias, session tag, scoring factors, trade plan, result.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Directional classification of a scored setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Long,
    Short,
    Neutral,
}

impl Bias {
    pub fn is_directional(self) -> bool {
        !matches!(self, Bias::Neutral)
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Bias::Long => "LONG",
            Bias::Short => "SHORT",
            Bias::Neutral => "NEUTRAL",
        };
        f.write_str(s)
    }
}

/// Coarse intraday phase used for time-of-day gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionTag {
    Opening,
    Midday,
    Power,
    Off,
}

impl fmt::Display for SessionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionTag::Opening => "OPENING",
            SessionTag::Midday => "MIDDAY",
            SessionTag::Power => "POWER",
            SessionTag::Off => "OFF",
        };
        f.write_str(s)
    }
}

/// Scoring factor. Weights sum to 100 per direction.
///
/// The first four are also the categories a preset can make mandatory,
/// checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Vwap,
    Rsi,
    Macd,
    Volume,
    MicroStructure,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Vwap,
        Factor::Rsi,
        Factor::Macd,
        Factor::Volume,
        Factor::MicroStructure,
    ];

    pub const fn weight(self) -> u32 {
        match self {
            Factor::Vwap => 35,
            Factor::Rsi => 20,
            Factor::Macd => 20,
            Factor::Volume => 15,
            Factor::MicroStructure => 10,
        }
    }

    /// Explanation label for a factor matched in the given direction.
    pub fn label(self, bias: Bias) -> &'static str {
        match (self, bias) {
            (Factor::Vwap, Bias::Short) => "VWAP rejection",
            (Factor::Vwap, _) => "VWAP reclaim",
            (Factor::Rsi, Bias::Short) => "RSI-fast downshift (RSI-slow ok)",
            (Factor::Rsi, _) => "RSI-fast snap-up (RSI-slow ok)",
            (Factor::Macd, Bias::Short) => "MACD hist turning down",
            (Factor::Macd, _) => "MACD hist turning up",
            (Factor::Volume, _) => "Volume confirmation",
            (Factor::MicroStructure, Bias::Short) => "Lower-high micro structure",
            (Factor::MicroStructure, _) => "Higher-low micro structure",
        }
    }
}

/// Why a result is NEUTRAL. Never surfaced as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    InsufficientData,
    TimeFiltered(SessionTag),
    MissingMandatoryEvent(Factor),
    NoDirectionalDominance,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InsufficientData => f.write_str("Not enough data"),
            Rejection::TimeFiltered(session) => {
                write!(f, "Filtered by time-of-day ({session})")
            }
            Rejection::MissingMandatoryEvent(factor) => f.write_str(match factor {
                Factor::Vwap => "No VWAP reclaim/rejection event",
                Factor::Rsi => "No RSI-fast snap/downshift event",
                Factor::Macd => "No MACD histogram turn event",
                Factor::Volume => "No volume confirmation",
                // Never mandatory; kept so the match stays exhaustive.
                Factor::MicroStructure => "No micro-structure confirmation",
            }),
            Rejection::NoDirectionalDominance => f.write_str("No directional dominance"),
        }
    }
}

/// A local price extreme over a symmetric bar neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub kind: SwingKind,
}

/// Entry, invalidation stop, and 1R/2R targets for a directional signal.
///
/// LONG: stop < entry < target_1r < target_2r.
/// SHORT: target_2r < target_1r < entry < stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry: f64,
    pub stop: f64,
    pub target_1r: f64,
    pub target_2r: f64,
}

impl TradePlan {
    /// Distance between entry and stop (one R).
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop).abs()
    }
}

/// Scored, classified, explainable signal for one symbol at its last bar.
///
/// Recomputed on every call; the trade plan is present iff the bias is
/// LONG or SHORT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: String,
    pub bias: Bias,
    /// 0..=100
    pub score: u8,
    pub reason: String,
    pub plan: Option<TradePlan>,
    pub last_price: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
    pub session: SessionTag,
    pub rejection: Option<Rejection>,
}

impl SignalResult {
    pub fn entry(&self) -> Option<f64> {
        self.plan.map(|p| p.entry)
    }

    pub fn stop(&self) -> Option<f64> {
        self.plan.map(|p| p.stop)
    }

    pub fn target_1r(&self) -> Option<f64> {
        self.plan.map(|p| p.target_1r)
    }

    pub fn target_2r(&self) -> Option<f64> {
        self.plan.map(|p| p.target_2r)
    }

    /// LONG/SHORT with a score at or above `threshold`.
    pub fn is_actionable(&self, threshold: u8) -> bool {
        self.bias.is_directional() && self.score >= threshold
    }
}
