//! # tally_core - Match Outcome Scoring and Dense Team Ranking
//!
//! Turns per-match records into deterministic win/loss/draw outcomes and a
//! cumulative per-team ranking.
//!
//! ## Features
//! - Three-tier tiebreak cascade (margin, secondary margin, classifier)
//! - Run-scoped team totals (no process-wide state)
//! - Dense ranking by `(score, net)` that never skips rank numbers
//! - Parallel scoring with an input-ordered fold
//!
//! The core performs no I/O; see the `tally_builder` crate for reading
//! match sheets.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ranking;
pub mod record;
pub mod scoring;
pub mod session;

pub use aggregate::{TeamStat, TeamTable};
pub use config::{ColumnLayout, MalformedPolicy, TallyConfig};
pub use error::{Result, TallyError};
pub use ranking::{build_ranking, dense_ranks, RankingBuilder, RankingEntry};
pub use record::{DetailRow, MatchRecord};
pub use scoring::{compute, Classifier, MatchOutcome, ScoreCalculator, Tier, FOUR_CATCH_MARKER};
pub use session::{score_batch_parallel, tally, TallyReport, TallySession};
