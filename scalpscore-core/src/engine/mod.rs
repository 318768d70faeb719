//! Confluence signal engine.
//!
//! One call scores one symbol at its last bar:
//! 1. insufficient-data guard
//! 2. truncate to the lookback window, compute VWAP/ATR, align oscillators
//! 3. time-of-day gate on the last bar's session
//! 4. event detection
//! 5. weighted per-direction scoring
//! 6. mandatory-check gating
//! 7. directional decision (threshold + strict dominance)
//! 8. trade plan
//!
//! Evaluation is a pure function of its arguments. Every rejection is a
//! NEUTRAL `SignalResult` carrying a typed `Rejection`, never an error.

pub mod events;
pub mod features;
pub mod levels;
pub mod scoring;

pub use events::EventSet;
pub use features::FeatureFrame;
pub use levels::trade_plan;
pub use scoring::{decide, first_missing_mandatory, score_directions, DirectionalScore};

use chrono::NaiveDateTime;

use crate::domain::{Bar, Bias, OscillatorSet, Rejection, SessionTag, SignalResult};
use crate::presets::{preset_for, Preset};
use crate::session::{RegularHours, SessionClassifier, SessionFilter};

/// Fewer bars than this and nothing is scored.
pub const MIN_BARS: usize = 60;
pub const DEFAULT_LOOKBACK_BARS: usize = 160;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub preset: Preset,
    pub sessions: SessionFilter,
    pub lookback_bars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            sessions: SessionFilter::default(),
            lookback_bars: DEFAULT_LOOKBACK_BARS,
        }
    }
}

/// Scores bar series against a fixed configuration and session classifier.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct SignalEngine<C = RegularHours> {
    config: EngineConfig,
    classifier: C,
}

impl SignalEngine<RegularHours> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_classifier(config, RegularHours::default())
    }
}

impl Default for SignalEngine<RegularHours> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: SessionClassifier> SignalEngine<C> {
    pub fn with_classifier(config: EngineConfig, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn evaluate(&self, symbol: &str, bars: &[Bar], oscillators: &OscillatorSet) -> SignalResult {
        let result = self.score(symbol, bars, oscillators);
        tracing::debug!(
            symbol,
            bias = %result.bias,
            score = result.score,
            session = %result.session,
            rejection = ?result.rejection,
            "signal evaluated"
        );
        result
    }

    fn score(&self, symbol: &str, bars: &[Bar], oscillators: &OscillatorSet) -> SignalResult {
        if bars.len() < MIN_BARS {
            return insufficient_data(symbol);
        }

        let frame = FeatureFrame::build(bars, oscillators, self.config.lookback_bars);
        let Some(last) = frame.last_bar() else {
            return insufficient_data(symbol);
        };
        let neutral = NeutralContext {
            symbol,
            last_price: last.close,
            timestamp: last.timestamp,
            session: self.classifier.classify(last.timestamp),
        };

        if !self.config.sessions.allows(neutral.session) {
            return neutral.reject(Rejection::TimeFiltered(neutral.session), 0, None);
        }

        let preset = &self.config.preset;
        let events = EventSet::detect(&frame, preset.volume_multiplier());
        let (long, short) = score_directions(&events);
        let best = long.points.max(short.points);

        if let Some(missing) = first_missing_mandatory(&events, preset.mandatory()) {
            return neutral.reject(Rejection::MissingMandatoryEvent(missing), best, None);
        }

        let bias = decide(long.points, short.points, preset.min_actionable_score());
        let winner = match bias {
            Bias::Long => &long,
            Bias::Short => &short,
            Bias::Neutral => {
                let summary = scoring::summarize(&long, &short);
                return neutral.reject(Rejection::NoDirectionalDominance, best, Some(summary));
            }
        };

        SignalResult {
            symbol: symbol.to_string(),
            bias,
            score: scoring::clamp_score(winner.points),
            reason: winner.explain(bias, scoring::REASON_FACTOR_LIMIT),
            plan: trade_plan(bias, &frame),
            last_price: Some(neutral.last_price),
            timestamp: Some(neutral.timestamp),
            session: neutral.session,
            rejection: None,
        }
    }
}

fn insufficient_data(symbol: &str) -> SignalResult {
    SignalResult {
        symbol: symbol.to_string(),
        bias: Bias::Neutral,
        score: 0,
        reason: Rejection::InsufficientData.to_string(),
        plan: None,
        last_price: None,
        timestamp: None,
        session: SessionTag::Off,
        rejection: Some(Rejection::InsufficientData),
    }
}

/// Last-bar context shared by every post-guard NEUTRAL result.
struct NeutralContext<'a> {
    symbol: &'a str,
    last_price: f64,
    timestamp: NaiveDateTime,
    session: SessionTag,
}

impl NeutralContext<'_> {
    fn reject(&self, rejection: Rejection, points: u32, reason: Option<String>) -> SignalResult {
        SignalResult {
            symbol: self.symbol.to_string(),
            bias: Bias::Neutral,
            score: scoring::clamp_score(points),
            reason: reason.unwrap_or_else(|| rejection.to_string()),
            plan: None,
            last_price: Some(self.last_price),
            timestamp: Some(self.timestamp),
            session: self.session,
            rejection: Some(rejection),
        }
    }
}

/// Score one symbol with a built-in preset (unknown names fall back to
/// "Cleaner signals") and the regular-hours session classifier.
pub fn compute_scalp_signal(
    symbol: &str,
    bars: &[Bar],
    oscillators: &OscillatorSet,
    preset_name: &str,
    sessions: SessionFilter,
    lookback_bars: usize,
) -> SignalResult {
    let config = EngineConfig {
        preset: preset_for(preset_name),
        sessions,
        lookback_bars,
    };
    SignalEngine::new(config).evaluate(symbol, bars, oscillators)
}
