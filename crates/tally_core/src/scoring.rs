//! # Score Calculator
//!
//! Resolves one match into a win/loss/draw outcome using three prioritised
//! rules. The first rule whose inputs differ decides the match; later rules
//! are not consulted.
//!
//! | Tier | Fields | Winner | Net margin |
//! |------|--------|--------|------------|
//! | Margin | `m` vs `n` | larger | `±|m-n|` |
//! | SecondaryMargin | `o` vs `p` | larger | 0 |
//! | Classifier | `r` vs `s` | smaller if `q` is four-catch, else larger | 0 |
//!
//! Only the classifier tier can end in a draw (`r == s`), in which case
//! neither side scores.

use crate::record::MatchRecord;
use serde::{Deserialize, Serialize};

/// Classifier value that inverts the tier-3 comparison
pub const FOUR_CATCH_MARKER: &str = "四抓";

/// Rule of the cascade that decided a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Margin,
    SecondaryMargin,
    Classifier,
}

/// Two-valued reading of the `q` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classifier {
    /// Smaller tiebreak value wins
    FourCatch,
    /// Larger tiebreak value wins
    Standard,
}

impl Classifier {
    pub fn from_flag(q: &str, marker: &str) -> Self {
        if q == marker {
            Classifier::FourCatch
        } else {
            Classifier::Standard
        }
    }
}

/// Result of scoring one match.
///
/// `score_a + score_b` is 1 except for a classifier-tier draw, where it is 0.
/// Net margins are non-zero only when the margin tier decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score_a: u8,
    pub score_b: u8,
    pub net_a: f64,
    pub net_b: f64,
    pub tier: Tier,
}

// `0.0 - x` rather than `-x`: a zero margin must stay +0.0.
fn loser_net(margin: f64) -> f64 {
    0.0 - margin
}

impl MatchOutcome {
    fn side_a(tier: Tier, margin: f64) -> Self {
        Self {
            score_a: 1,
            score_b: 0,
            net_a: margin,
            net_b: loser_net(margin),
            tier,
        }
    }

    fn side_b(tier: Tier, margin: f64) -> Self {
        Self {
            score_a: 0,
            score_b: 1,
            net_a: loser_net(margin),
            net_b: margin,
            tier,
        }
    }

    fn draw(tier: Tier) -> Self {
        Self {
            score_a: 0,
            score_b: 0,
            net_a: 0.0,
            net_b: 0.0,
            tier,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.score_a == 0 && self.score_b == 0
    }

    /// Points awarded across both sides (0 or 1)
    pub fn points_awarded(&self) -> u8 {
        self.score_a + self.score_b
    }
}

/// Tier 1: the larger of `m`/`n` wins by `|m-n|`.
fn margin_rule(m: f64, n: f64) -> Option<MatchOutcome> {
    if m == n {
        return None;
    }
    let margin = (m - n).abs();
    Some(if m > n {
        MatchOutcome::side_a(Tier::Margin, margin)
    } else {
        MatchOutcome::side_b(Tier::Margin, margin)
    })
}

/// Tier 2: the larger of `o`/`p` wins, no margin.
fn secondary_rule(o: f64, p: f64) -> Option<MatchOutcome> {
    if o == p {
        return None;
    }
    Some(if o > p {
        MatchOutcome::side_a(Tier::SecondaryMargin, 0.0)
    } else {
        MatchOutcome::side_b(Tier::SecondaryMargin, 0.0)
    })
}

/// Tier 3: `r`/`s` compared in the direction the classifier selects.
fn classifier_rule(classifier: Classifier, r: f64, s: f64) -> MatchOutcome {
    let (a_wins, b_wins) = match classifier {
        Classifier::FourCatch => (r < s, r > s),
        Classifier::Standard => (r > s, r < s),
    };
    if a_wins {
        MatchOutcome::side_a(Tier::Classifier, 0.0)
    } else if b_wins {
        MatchOutcome::side_b(Tier::Classifier, 0.0)
    } else {
        MatchOutcome::draw(Tier::Classifier)
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve(
    m: f64,
    n: f64,
    o: f64,
    p: f64,
    classifier: Classifier,
    r: f64,
    s: f64,
) -> MatchOutcome {
    margin_rule(m, n)
        .or_else(|| secondary_rule(o, p))
        .unwrap_or_else(|| classifier_rule(classifier, r, s))
}

/// Score one match with the default four-catch marker.
///
/// Total over all `f64` inputs: NaN comparisons are never "greater" or
/// "less", so a NaN reaching tier 3 yields a draw.
///
/// # Examples
/// ```
/// use tally_core::scoring::{compute, Tier};
///
/// let outcome = compute(5.0, 2.0, 0.0, 0.0, "", 0.0, 0.0);
/// assert_eq!((outcome.score_a, outcome.net_a), (1, 3.0));
/// assert_eq!((outcome.score_b, outcome.net_b), (0, -3.0));
/// assert_eq!(outcome.tier, Tier::Margin);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn compute(m: f64, n: f64, o: f64, p: f64, q: &str, r: f64, s: f64) -> MatchOutcome {
    resolve(m, n, o, p, Classifier::from_flag(q, FOUR_CATCH_MARKER), r, s)
}

/// Scoring cascade bound to a configured classifier marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCalculator {
    marker: String,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(FOUR_CATCH_MARKER)
    }
}

impl ScoreCalculator {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &crate::config::ScoringConfig) -> Self {
        Self::new(config.four_catch_marker.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn classify(&self, q: &str) -> Classifier {
        Classifier::from_flag(q, &self.marker)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn compute(&self, m: f64, n: f64, o: f64, p: f64, q: &str, r: f64, s: f64) -> MatchOutcome {
        resolve(m, n, o, p, self.classify(q), r, s)
    }

    pub fn score(&self, record: &MatchRecord) -> MatchOutcome {
        self.compute(
            record.m, record.n, record.o, record.p, &record.q, record.r, record.s,
        )
    }
}
