//! Tally Builder Library
//!
//! CSV match sheet → Vec<MatchRecord> → TallySession → TallyReport
//!
//! The row-parsing side of a tally run: column indexing, missing-cell
//! defaults and the malformed-row policy live here so the core only ever
//! sees well-formed records.

pub mod match_sheet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tally_core::{TallyConfig, TallyReport, TallySession};
use tracing::info;

pub use match_sheet::{parse_csv, parse_reader, ParseStats};

/// Result of tallying one match sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyRun {
    /// Where the rows came from (file path or caller-supplied label)
    pub source: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub stats: ParseStats,
    pub report: TallyReport,
}

/// Tally a match sheet from any reader
///
/// # Arguments
///
/// * `reader` - CSV source with a header row
/// * `source` - Label recorded in the returned [`TallyRun`]
/// * `config` - Validated before any row is read
pub fn tally_reader<R: io::Read>(
    reader: R,
    source: &str,
    config: &TallyConfig,
) -> Result<TallyRun> {
    config.validate().context("Invalid tally configuration")?;

    let (records, stats) = parse_reader(reader, &config.columns, &config.ingest)?;
    Ok(run(records, stats, source, config))
}

/// Tally a match sheet file
///
/// # Returns
///
/// Detail rows, dense-ranked standings and parse statistics. A sheet with
/// no data rows yields an empty report, not an error.
pub fn tally_csv(csv_path: &Path, config: &TallyConfig) -> Result<TallyRun> {
    config.validate().context("Invalid tally configuration")?;

    info!(path = %csv_path.display(), "tallying match sheet");
    let (records, stats) = parse_csv(csv_path, &config.columns, &config.ingest)?;
    Ok(run(records, stats, &csv_path.display().to_string(), config))
}

fn run(
    records: Vec<tally_core::MatchRecord>,
    stats: ParseStats,
    source: &str,
    config: &TallyConfig,
) -> TallyRun {
    let mut session = TallySession::new(config);
    session.process_parallel(&records);

    TallyRun {
        source: source.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        stats,
        report: session.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_core::FOUR_CATCH_MARKER;

    const HEADER: &str = "no,date,home,away,e,f,g,h,i,j,k,l,m,n,o,p,q,r,s";

    fn sheet(rows: &[(&str, &str, [&str; 7])]) -> String {
        let mut out = format!("{}\n", HEADER);
        for (i, (a, b, tail)) in rows.iter().enumerate() {
            out.push_str(&format!(
                "{},2024-05-0{},{},{},,,,,,,,,{}\n",
                i + 1,
                i + 1,
                a,
                b,
                tail.join(",")
            ));
        }
        out
    }

    #[test]
    fn test_tally_csv_end_to_end() {
        let contents = sheet(&[
            ("A", "B", ["5", "2", "0", "0", "", "0", "0"]),
            ("C", "A", ["3", "3", "1", "0", "", "0", "0"]),
            ("B", "C", ["1", "1", "2", "2", FOUR_CATCH_MARKER, "4", "9"]),
            ("A", "C", ["0", "0", "0", "0", "", "7", "7"]),
        ]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        let run = tally_csv(file.path(), &TallyConfig::default()).unwrap();
        assert_eq!(run.stats.parsed, 4);
        assert_eq!(run.report.matches, 4);
        assert!(!run.created_at.is_empty());

        let details: Vec<(u8, f64, u8, f64)> = run
            .report
            .details
            .iter()
            .map(|d| (d.score_a, d.net_a, d.score_b, d.net_b))
            .collect();
        assert_eq!(
            details,
            vec![
                (1, 3.0, 0, -3.0),
                (1, 0.0, 0, 0.0),
                (1, 0.0, 0, 0.0),
                (0, 0.0, 0, 0.0),
            ]
        );

        // A: 1 pt, net 3, 3 games; B: 1 pt, net -3; C: 1 pt, net 0
        let standings: Vec<(u32, &str, f64, f64, u32)> = run
            .report
            .ranking
            .iter()
            .map(|e| (e.rank, e.team.as_str(), e.score, e.net, e.games))
            .collect();
        assert_eq!(
            standings,
            vec![
                (1, "A", 1.0, 3.0, 3),
                (2, "C", 1.0, 0.0, 3),
                (3, "B", 1.0, -3.0, 2),
            ]
        );
    }

    #[test]
    fn test_tally_reader_shares_ranks() {
        let contents = sheet(&[
            ("X", "Z", ["4", "0", "0", "0", "", "0", "0"]),
            ("Y", "W", ["4", "0", "0", "0", "", "0", "0"]),
        ]);
        let run = tally_reader(contents.as_bytes(), "inline", &TallyConfig::default()).unwrap();
        assert_eq!(run.source, "inline");

        let ranks: Vec<(&str, u32)> = run
            .report
            .ranking
            .iter()
            .map(|e| (e.team.as_str(), e.rank))
            .collect();
        assert_eq!(ranks, vec![("X", 1), ("Y", 1), ("W", 2), ("Z", 2)]);
    }

    #[test]
    fn test_empty_sheet_is_empty_report() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let run = tally_csv(file.path(), &TallyConfig::default()).unwrap();
        assert!(run.report.is_empty());
        assert!(run.report.ranking.is_empty());
        assert_eq!(run.stats.total_rows, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_reading() {
        let mut config = TallyConfig::default();
        config.columns.team_b = config.columns.team_a;
        let err = tally_reader("".as_bytes(), "inline", &config).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid tally configuration"));
    }

    #[test]
    fn test_empty_cell_row_is_detailed_but_not_ranked() {
        let contents = format!(
            "{},,,,,,,,\n",
            sheet(&[("A", "B", ["2", "1", "0", "0", "", "0", "0"])])
        );
        let run = tally_reader(contents.as_bytes(), "inline", &TallyConfig::default()).unwrap();
        assert_eq!(run.report.details.len(), 2);

        let blank = &run.report.details[1];
        assert_eq!((blank.team_a.as_str(), blank.team_b.as_str()), ("", ""));
        assert_eq!((blank.score_a, blank.score_b), (0, 0));
        assert_eq!(run.report.teams, 2);
        assert!(run.report.ranking.iter().all(|e| !e.team.is_empty()));
    }

    #[test]
    fn test_malformed_row_is_not_aggregated() {
        let contents = sheet(&[
            ("A", "B", ["abc", "2", "0", "0", "", "0", "0"]),
            ("A", "C", ["2", "1", "0", "0", "", "0", "0"]),
        ]);
        let run = tally_reader(contents.as_bytes(), "inline", &TallyConfig::default()).unwrap();
        assert_eq!(run.stats.failed, 1);
        assert_eq!(run.report.details.len(), 1);
        assert!(run.report.ranking.iter().all(|e| e.team != "B"));

        let lenient =
            tally_reader(contents.as_bytes(), "inline", &TallyConfig::lenient()).unwrap();
        assert_eq!(lenient.report.details.len(), 2);
        // m defaults to 0.0, so B wins the first match by 2
        assert_eq!(lenient.report.details[0].score_b, 1);
        assert_eq!(lenient.report.details[0].net_b, 2.0);
    }
}
