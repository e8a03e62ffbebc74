//! Match record and detail row types
//!
//! A [`MatchRecord`] is one transient input row: two team names plus the
//! seven raw fields the scoring cascade reads. A [`DetailRow`] is the
//! per-match output line, emitted in input order.

use crate::scoring::MatchOutcome;
use serde::{Deserialize, Serialize};

/// One match as seen by the scoring core.
///
/// `m`/`n` feed the margin tier, `o`/`p` the secondary margin tier, and
/// `q`, `r`/`s` the classifier tier. Fields absent or unparsable upstream
/// arrive as `0.0` (numeric) or an empty string (`q`); the core never parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team_a: String,
    pub team_b: String,
    /// Team A's primary margin value
    pub m: f64,
    /// Team B's primary margin value
    pub n: f64,
    /// Team A's secondary margin value
    pub o: f64,
    /// Team B's secondary margin value
    pub p: f64,
    /// Classifier flag; only the four-catch marker is significant
    pub q: String,
    /// Team A's tiebreak value
    pub r: f64,
    /// Team B's tiebreak value
    pub s: f64,
}

impl MatchRecord {
    /// Record between two teams with every scoring field zeroed
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, m: f64, n: f64) -> Self {
        self.m = m;
        self.n = n;
        self
    }

    pub fn with_secondary(mut self, o: f64, p: f64) -> Self {
        self.o = o;
        self.p = p;
        self
    }

    pub fn with_tiebreak(mut self, q: impl Into<String>, r: f64, s: f64) -> Self {
        self.q = q.into();
        self.r = r;
        self.s = s;
        self
    }
}

/// Per-match output line: `(team_a, team_b, score_a, net_a, score_b, net_b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub team_a: String,
    pub team_b: String,
    pub score_a: u8,
    pub net_a: f64,
    pub score_b: u8,
    pub net_b: f64,
}

impl DetailRow {
    pub fn new(record: &MatchRecord, outcome: &MatchOutcome) -> Self {
        Self {
            team_a: record.team_a.clone(),
            team_b: record.team_b.clone(),
            score_a: outcome.score_a,
            net_a: outcome.net_a,
            score_b: outcome.score_b,
            net_b: outcome.net_b,
        }
    }
}
