//! Weighted per-direction tallies, mandatory-check gating, and the
//! directional decision.

use crate::domain::{Bias, Factor};
use crate::presets::MandatoryChecks;

use super::events::EventSet;

/// Factors quoted in a directional reason.
pub const REASON_FACTOR_LIMIT: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionalScore {
    pub points: u32,
    /// Matched factors in encounter order.
    pub factors: Vec<Factor>,
}

impl DirectionalScore {
    pub fn tally(matches: [(Factor, bool); 5]) -> Self {
        let mut score = Self::default();
        for (factor, matched) in matches {
            if matched {
                score.points += factor.weight();
                score.factors.push(factor);
            }
        }
        score
    }

    /// Comma-joined factor labels, at most `limit` of them.
    pub fn explain(&self, bias: Bias, limit: usize) -> String {
        self.factors
            .iter()
            .take(limit)
            .map(|f| f.label(bias))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn score_directions(events: &EventSet) -> (DirectionalScore, DirectionalScore) {
    (
        DirectionalScore::tally(events.long_matches()),
        DirectionalScore::tally(events.short_matches()),
    )
}

/// First mandatory category (in fixed order) that fired in neither direction.
pub fn first_missing_mandatory(events: &EventSet, mandatory: &MandatoryChecks) -> Option<Factor> {
    mandatory.required().find(|&factor| !events.fired(factor))
}

/// LONG/SHORT only with threshold met and strict dominance; ties are NEUTRAL.
pub fn decide(long_points: u32, short_points: u32, min_score: u32) -> Bias {
    if long_points >= min_score && long_points > short_points {
        Bias::Long
    } else if short_points >= min_score && short_points > long_points {
        Bias::Short
    } else {
        Bias::Neutral
    }
}

/// "LongScore=N (…); ShortScore=M (…)" with every matched factor.
pub fn summarize(long: &DirectionalScore, short: &DirectionalScore) -> String {
    format!(
        "LongScore={} ({}); ShortScore={} ({})",
        long.points,
        long.explain(Bias::Long, usize::MAX),
        short.points,
        short.explain(Bias::Short, usize::MAX),
    )
}

/// Clamp accumulated points to the 0..=100 score scale.
pub fn clamp_score(points: u32) -> u8 {
    points.min(100) as u8
}
