//! Team Aggregator
//!
//! Running per-team totals for a single tally run. A [`TeamTable`] is owned
//! by whoever drives the run (usually a [`crate::session::TallySession`]),
//! so independent runs never share state.

use crate::scoring::MatchOutcome;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Cumulative totals of one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStat {
    /// Sum of awarded points
    pub score: f64,
    /// Sum of net margins
    pub net: f64,
    /// Matches the team appeared in
    pub games: u32,
}

impl TeamStat {
    fn record(&mut self, score: f64, net: f64) {
        self.score += score;
        self.net += net;
        self.games += 1;
    }

    fn absorb(&mut self, other: &TeamStat) {
        self.score += other.score;
        self.net += other.net;
        self.games += other.games;
    }
}

/// Team name → running totals
///
/// FxHashMap gives a hash order that is stable across runs, which keeps
/// rankings reproducible even without the team-name tiebreak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTable {
    stats: FxHashMap<String, TeamStat>,
}

impl TeamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one side of a match into the table.
    ///
    /// An empty team name is ignored and `false` is returned. Otherwise the
    /// team's entry is created zeroed on first sight, `score` and `net` are
    /// added and `games` is incremented.
    pub fn update(&mut self, team_name: &str, score: f64, net: f64) -> bool {
        if team_name.is_empty() {
            return false;
        }
        match self.stats.get_mut(team_name) {
            Some(stat) => stat.record(score, net),
            None => {
                let mut stat = TeamStat::default();
                stat.record(score, net);
                self.stats.insert(team_name.to_string(), stat);
            }
        }
        true
    }

    /// Fold both sides of one match, each with its own half of the outcome.
    pub fn record_outcome(&mut self, team_a: &str, team_b: &str, outcome: &MatchOutcome) {
        self.update(team_a, f64::from(outcome.score_a), outcome.net_a);
        self.update(team_b, f64::from(outcome.score_b), outcome.net_b);
    }

    /// Combine another table into this one, keyed by team name.
    ///
    /// Games add up, so a team seen in both tables keeps one game per match.
    pub fn merge(&mut self, other: TeamTable) {
        for (team, stat) in other.stats {
            self.stats.entry(team).or_default().absorb(&stat);
        }
    }

    pub fn get(&self, team_name: &str) -> Option<&TeamStat> {
        self.stats.get(team_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamStat)> {
        self.stats.iter().map(|(team, stat)| (team.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
