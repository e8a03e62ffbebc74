//! # Ranking Builder
//!
//! Orders team totals by `(score, net)` descending and assigns dense ranks:
//! entries with identical `(score, net)` share a rank, and the next distinct
//! pair gets exactly one more. Rank numbers are never skipped, so group
//! sizes `2, 1` give ranks `1, 1, 2` (not the `1, 1, 3` of competition
//! ranking). `games` never affects order.

use crate::aggregate::TeamTable;
use crate::config::RankingConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One line of the final standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub team: String,
    pub score: f64,
    pub net: f64,
    pub games: u32,
}

// -0.0 and 0.0 must land in the same group.
fn canonical(x: f64) -> f64 {
    x + 0.0
}

/// Descending order on `(score, net)`; `Equal` means same rank group.
pub fn standing_order(a: (f64, f64), b: (f64, f64)) -> Ordering {
    canonical(b.0)
        .total_cmp(&canonical(a.0))
        .then_with(|| canonical(b.1).total_cmp(&canonical(a.1)))
}

/// Dense ranks for keys already sorted by [`standing_order`].
///
/// # Examples
/// ```
/// use tally_core::ranking::dense_ranks;
///
/// let keys = [(5.0, 10.0), (5.0, 10.0), (3.0, 1.0)];
/// assert_eq!(dense_ranks(&keys), vec![1, 1, 2]);
/// ```
pub fn dense_ranks(sorted_keys: &[(f64, f64)]) -> Vec<u32> {
    let mut rank = 0u32;
    let mut previous: Option<(f64, f64)> = None;

    sorted_keys
        .iter()
        .map(|&key| {
            let new_group =
                previous.map_or(true, |prev| standing_order(prev, key) != Ordering::Equal);
            if new_group {
                rank += 1;
            }
            previous = Some(key);
            rank
        })
        .collect()
}

/// Builds ranked standings from a [`TeamTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingBuilder {
    team_name_tiebreak: bool,
}

impl Default for RankingBuilder {
    fn default() -> Self {
        Self {
            team_name_tiebreak: true,
        }
    }
}

impl RankingBuilder {
    pub fn new(team_name_tiebreak: bool) -> Self {
        Self { team_name_tiebreak }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.team_name_tiebreak)
    }

    pub fn build(&self, table: &TeamTable) -> Vec<RankingEntry> {
        let mut rows: Vec<_> = table.iter().collect();
        rows.sort_by(|(team_a, a), (team_b, b)| {
            let order = standing_order((a.score, a.net), (b.score, b.net));
            if self.team_name_tiebreak {
                order.then_with(|| team_a.cmp(team_b))
            } else {
                order
            }
        });

        let keys: Vec<(f64, f64)> = rows.iter().map(|(_, stat)| (stat.score, stat.net)).collect();
        let ranks = dense_ranks(&keys);

        rows.into_iter()
            .zip(ranks)
            .map(|((team, stat), rank)| RankingEntry {
                rank,
                team: team.to_string(),
                score: stat.score,
                net: stat.net,
                games: stat.games,
            })
            .collect()
    }
}

/// Rank a table with the default team-name tiebreak
pub fn build_ranking(table: &TeamTable) -> Vec<RankingEntry> {
    RankingBuilder::default().build(table)
}
