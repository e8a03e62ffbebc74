//! Tally Configuration
//!
//! Groups every tunable of a scoring run in one place: the classifier
//! marker used by the tier-3 tiebreak, the column layout of a match sheet,
//! how malformed rows are handled, and how exact standing ties are ordered.
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::config::{MalformedPolicy, TallyConfig};
//!
//! // Default configuration
//! let config = TallyConfig::default();
//! assert_eq!(config.ingest.malformed_numeric, MalformedPolicy::SkipRow);
//!
//! // Lenient preset (bad numbers become 0.0 instead of dropping the row)
//! let lenient = TallyConfig::lenient();
//! assert_eq!(lenient.ingest.malformed_numeric, MalformedPolicy::DefaultToZero);
//!
//! // From environment variable
//! let from_env = TallyConfig::from_env_or_default();
//! # let _ = from_env;
//! ```
//!
//! ## Environment Variables
//!
//! - `TALLY_PROFILE`: Select preset (strict, lenient, default)

use crate::error::{Result, TallyError};
use crate::scoring::FOUR_CATCH_MARKER;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable selecting a configuration preset
pub const PROFILE_ENV: &str = "TALLY_PROFILE";

/// Complete configuration for one tally run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Scoring cascade settings
    pub scoring: ScoringConfig,
    /// Column positions in a match sheet row
    pub columns: ColumnLayout,
    /// Row parsing policies
    pub ingest: IngestConfig,
    /// Ranking order settings
    pub ranking: RankingConfig,
}

impl TallyConfig {
    /// Strict preset - malformed rows are dropped and short rows get no invented names
    pub fn strict() -> Self {
        Self {
            ingest: IngestConfig {
                malformed_numeric: MalformedPolicy::SkipRow,
                placeholder_team_names: false,
            },
            ..Self::default()
        }
    }

    /// Lenient preset - malformed numbers count as 0.0 and every row is kept
    pub fn lenient() -> Self {
        Self {
            ingest: IngestConfig {
                malformed_numeric: MalformedPolicy::DefaultToZero,
                placeholder_team_names: true,
            },
            ..Self::default()
        }
    }

    /// Load from environment variable TALLY_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var(PROFILE_ENV).unwrap_or_default())
    }

    /// Resolve a preset by name; unknown names fall back to the default
    pub fn from_profile(profile: &str) -> Self {
        match profile.trim().to_lowercase().as_str() {
            "strict" => Self::strict(),
            "lenient" => Self::lenient(),
            _ => Self::default(),
        }
    }

    /// Parse a YAML document and validate it.
    ///
    /// Missing sections and fields keep their default values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TallyConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scoring.four_catch_marker.is_empty() {
            return Err(TallyError::InvalidConfig(
                "four_catch_marker must not be empty".to_string(),
            ));
        }
        if self.columns.team_a == self.columns.team_b {
            return Err(TallyError::InvalidConfig(format!(
                "team_a and team_b share column {}",
                self.columns.team_a
            )));
        }
        Ok(())
    }
}

/// Scoring cascade settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Classifier value that inverts the tier-3 comparison
    pub four_catch_marker: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            four_catch_marker: FOUR_CATCH_MARKER.to_string(),
        }
    }
}

/// Zero-based column indices of a match sheet row
///
/// Defaults follow the spreadsheet letters of the source sheets:
/// teams in C/D, scoring fields in M..S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub team_a: usize,
    pub team_b: usize,
    pub m: usize,
    pub n: usize,
    pub o: usize,
    pub p: usize,
    pub q: usize,
    pub r: usize,
    pub s: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            team_a: 2,
            team_b: 3,
            m: 12,
            n: 13,
            o: 14,
            p: 15,
            q: 16,
            r: 17,
            s: 18,
        }
    }
}

/// What to do with a numeric cell that does not parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the whole row and report it
    #[default]
    SkipRow,
    /// Substitute 0.0 for the bad cell and keep the row
    DefaultToZero,
}

/// Row parsing policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub malformed_numeric: MalformedPolicy,
    /// Invent `Team{row}A` / `Team{row}B` when a row has no team column
    pub placeholder_team_names: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            malformed_numeric: MalformedPolicy::SkipRow,
            placeholder_team_names: true,
        }
    }
}

/// Ranking order settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Order exact (score, net) duplicates by team name
    pub team_name_tiebreak: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            team_name_tiebreak: true,
        }
    }
}
