//! Tally Session - one scoring run
//!
//! Pipeline: MatchRecord → ScoreCalculator → DetailRow + TeamTable fold →
//! RankingBuilder → TallyReport
//!
//! A session owns its [`TeamTable`]; starting a new session starts from an
//! empty table, so runs never see each other's totals.

use crate::aggregate::TeamTable;
use crate::config::TallyConfig;
use crate::ranking::{RankingBuilder, RankingEntry};
use crate::record::{DetailRow, MatchRecord};
use crate::scoring::{MatchOutcome, ScoreCalculator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Batches smaller than this are scored on the calling thread
const PARALLEL_THRESHOLD: usize = 256;

/// Everything a finished run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyReport {
    /// One row per processed match, in input order
    pub details: Vec<DetailRow>,
    /// Dense-ranked standings
    pub ranking: Vec<RankingEntry>,
    /// Matches processed
    pub matches: usize,
    /// Distinct named teams
    pub teams: usize,
}

impl TallyReport {
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

/// Score a batch of records without touching any team totals.
///
/// Outcomes are returned in input order. Large batches are scored with rayon.
pub fn score_batch_parallel(
    records: &[MatchRecord],
    calculator: &ScoreCalculator,
) -> Vec<MatchOutcome> {
    if records.len() > PARALLEL_THRESHOLD {
        records.par_iter().map(|r| calculator.score(r)).collect()
    } else {
        records.iter().map(|r| calculator.score(r)).collect()
    }
}

/// State of a single scoring run
#[derive(Debug, Clone)]
pub struct TallySession {
    calculator: ScoreCalculator,
    ranking: RankingBuilder,
    table: TeamTable,
    details: Vec<DetailRow>,
}

impl Default for TallySession {
    fn default() -> Self {
        Self::new(&TallyConfig::default())
    }
}

impl TallySession {
    pub fn new(config: &TallyConfig) -> Self {
        Self::with_parts(
            ScoreCalculator::from_config(&config.scoring),
            RankingBuilder::from_config(&config.ranking),
        )
    }

    pub fn with_parts(calculator: ScoreCalculator, ranking: RankingBuilder) -> Self {
        Self {
            calculator,
            ranking,
            table: TeamTable::new(),
            details: Vec::new(),
        }
    }

    /// Score one record, emit its detail row and fold both sides into the table.
    pub fn process(&mut self, record: &MatchRecord) -> &DetailRow {
        let outcome = self.calculator.score(record);
        self.fold(record, &outcome)
    }

    pub fn process_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        for record in records {
            self.process(record);
        }
    }

    /// Score records in parallel, then fold them in input order.
    ///
    /// Gives the same details and totals as [`TallySession::process_all`].
    pub fn process_parallel(&mut self, records: &[MatchRecord]) {
        let outcomes = score_batch_parallel(records, &self.calculator);
        for (record, outcome) in records.iter().zip(&outcomes) {
            self.fold(record, outcome);
        }
    }

    fn fold(&mut self, record: &MatchRecord, outcome: &MatchOutcome) -> &DetailRow {
        debug!(
            team_a = %record.team_a,
            team_b = %record.team_b,
            tier = ?outcome.tier,
            score_a = outcome.score_a,
            score_b = outcome.score_b,
            "match scored"
        );
        self.table
            .record_outcome(&record.team_a, &record.team_b, outcome);
        self.details.push(DetailRow::new(record, outcome));
        &self.details[self.details.len() - 1]
    }

    pub fn details(&self) -> &[DetailRow] {
        &self.details
    }

    pub fn table(&self) -> &TeamTable {
        &self.table
    }

    /// Standings as of the records processed so far
    pub fn standings(&self) -> Vec<RankingEntry> {
        self.ranking.build(&self.table)
    }

    pub fn finish(self) -> TallyReport {
        let ranking = self.ranking.build(&self.table);
        let report = TallyReport {
            matches: self.details.len(),
            teams: self.table.len(),
            details: self.details,
            ranking,
        };
        info!(
            matches = report.matches,
            teams = report.teams,
            "tally complete"
        );
        report
    }
}

/// Run a complete tally over in-memory records.
pub fn tally(records: &[MatchRecord], config: &TallyConfig) -> TallyReport {
    let mut session = TallySession::new(config);
    session.process_all(records);
    session.finish()
}
