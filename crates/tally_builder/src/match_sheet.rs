//! Match Sheet Parser - CSV → Vec<MatchRecord>
//!
//! Reads comma-separated match sheets whose first row is a header. Column
//! positions come from [`ColumnLayout`] (teams in C/D, scoring fields in
//! M..S by default).
//!
//! ## Row policy
//!
//! - Only truly empty lines are dropped (the csv crate never yields them).
//!   A row of empty cells such as `,,,` is kept as a match with empty team
//!   names, which scores as a draw and stays out of the standings.
//! - Numeric cells are trimmed; a missing or empty cell is `0.0`.
//! - A numeric cell that does not parse either drops the row
//!   ([`MalformedPolicy::SkipRow`]) or becomes `0.0`
//!   ([`MalformedPolicy::DefaultToZero`]).
//! - The classifier cell is trimmed; missing is `""`.
//! - Team names are taken as-is. A row too short to hold a team column gets
//!   `队伍{row}A` / `队伍{row}B` when placeholders are enabled, otherwise an
//!   empty name (which the aggregator ignores).

use anyhow::{Context, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tally_core::config::{ColumnLayout, IngestConfig, MalformedPolicy};
use tally_core::MatchRecord;
use tracing::{info, warn};

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Data rows seen after the header
    pub total_rows: u32,
    pub parsed: u32,
    /// Rows dropped because of a malformed numeric cell or CSV error
    pub failed: u32,
    /// Malformed numeric cells replaced by 0.0
    pub defaulted_cells: u32,
}

/// Parse one numeric cell. `Err` carries the offending text.
fn parse_numeric(cell: Option<&str>) -> std::result::Result<f64, String> {
    match cell.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(raw) => raw.parse::<f64>().map_err(|_| raw.to_string()),
    }
}

/// Prefix of invented team names for rows without a team column
pub const PLACEHOLDER_TEAM_PREFIX: &str = "队伍";

fn team_name(record: &StringRecord, idx: usize, row: u32, side: char, placeholders: bool) -> String {
    match record.get(idx) {
        Some(name) => name.to_string(),
        None if placeholders => format!("{}{}{}", PLACEHOLDER_TEAM_PREFIX, row, side),
        None => String::new(),
    }
}

/// Parse a match sheet from any reader
///
/// # Arguments
///
/// * `reader` - CSV source; the first row is always treated as a header
/// * `layout` - Column positions
/// * `ingest` - Malformed-cell and placeholder policies
///
/// # Returns
///
/// * `Ok((records, stats))` - Records in input order and row statistics
/// * `Err(anyhow::Error)` - Only on I/O failure of the underlying reader
pub fn parse_reader<R: io::Read>(
    reader: R,
    layout: &ColumnLayout,
    ingest: &IngestConfig,
) -> Result<(Vec<MatchRecord>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut stats = ParseStats::default();

    // Helper macro for numeric cells: applies the malformed policy, `continue`s on SkipRow
    macro_rules! parse_f64 {
        ($record:expr, $idx:expr, $name:expr, $row:expr, $stats:expr) => {
            match parse_numeric($record.get($idx)) {
                Ok(v) => v,
                Err(raw) => match ingest.malformed_numeric {
                    MalformedPolicy::DefaultToZero => {
                        $stats.defaulted_cells += 1;
                        warn!(
                            row = $row,
                            column = $name,
                            value = %raw,
                            "invalid number, using 0.0"
                        );
                        0.0
                    }
                    MalformedPolicy::SkipRow => {
                        $stats.failed += 1;
                        warn!(
                            row = $row,
                            column = $name,
                            value = %raw,
                            "invalid number, skipping row"
                        );
                        continue;
                    }
                },
            }
        };
    }

    for result in reader.records() {
        stats.total_rows += 1;
        let row = stats.total_rows;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if e.is_io_error() {
                    return Err(e).context("Failed to read match sheet");
                }
                stats.failed += 1;
                warn!(row, error = %e, "CSV parse error, skipping row");
                continue;
            }
        };

        let m = parse_f64!(record, layout.m, "M", row, stats);
        let n = parse_f64!(record, layout.n, "N", row, stats);
        let o = parse_f64!(record, layout.o, "O", row, stats);
        let p = parse_f64!(record, layout.p, "P", row, stats);
        let q = record.get(layout.q).map(str::trim).unwrap_or_default();
        let r = parse_f64!(record, layout.r, "R", row, stats);
        let s = parse_f64!(record, layout.s, "S", row, stats);

        let placeholders = ingest.placeholder_team_names;
        records.push(MatchRecord {
            team_a: team_name(&record, layout.team_a, row, 'A', placeholders),
            team_b: team_name(&record, layout.team_b, row, 'B', placeholders),
            m,
            n,
            o,
            p,
            q: q.to_string(),
            r,
            s,
        });
        stats.parsed += 1;
    }

    info!(
        parsed = stats.parsed,
        failed = stats.failed,
        total_rows = stats.total_rows,
        "match sheet parsed"
    );

    Ok((records, stats))
}

/// Parse a match sheet file. See [`parse_reader`].
pub fn parse_csv(
    csv_path: &Path,
    layout: &ColumnLayout,
    ingest: &IngestConfig,
) -> Result<(Vec<MatchRecord>, ParseStats)> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    parse_reader(file, layout, ingest)
        .with_context(|| format!("Failed to parse CSV file: {}", csv_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "a,b,home,away,e,f,g,h,i,j,k,l,m,n,o,p,q,r,s\n";

    /// Build a full-width row with teams in C/D and the given M..S cells
    fn row(team_a: &str, team_b: &str, tail: [&str; 7]) -> String {
        format!(
            ",,{},{},,,,,,,,,{}\n",
            team_a,
            team_b,
            tail.join(",")
        )
    }

    fn parse(body: &str, ingest: IngestConfig) -> (Vec<MatchRecord>, ParseStats) {
        let input = format!("{}{}", HEADER, body);
        parse_reader(input.as_bytes(), &ColumnLayout::default(), &ingest).unwrap()
    }

    #[test]
    fn test_parse_numeric_cells() {
        assert_eq!(parse_numeric(None), Ok(0.0));
        assert_eq!(parse_numeric(Some("   ")), Ok(0.0));
        assert_eq!(parse_numeric(Some(" 2.5 ")), Ok(2.5));
        assert_eq!(parse_numeric(Some("x1")), Err("x1".to_string()));
    }

    #[test]
    fn test_full_row() {
        let body = row("Lions", "Tigers", ["5", "2", "0", "0", " 四抓 ", "4", "9"]);
        let (records, stats) = parse(&body, IngestConfig::default());

        assert_eq!(stats.parsed, 1);
        let record = &records[0];
        assert_eq!((record.team_a.as_str(), record.team_b.as_str()), ("Lions", "Tigers"));
        assert_eq!((record.m, record.n, record.o, record.p), (5.0, 2.0, 0.0, 0.0));
        assert_eq!(record.q, "四抓");
        assert_eq!((record.r, record.s), (4.0, 9.0));
    }

    #[test]
    fn test_empty_and_missing_cells_are_zero() {
        let body = ",,A,B,,,,,,,,,3,,,\n";
        let (records, stats) = parse(body, IngestConfig::default());
        assert_eq!(stats.parsed, 1);
        let record = &records[0];
        assert_eq!((record.m, record.n, record.o, record.p), (3.0, 0.0, 0.0, 0.0));
        assert_eq!(record.q, "");
        assert_eq!((record.r, record.s), (0.0, 0.0));
    }

    #[test]
    fn test_malformed_number_skips_row_by_default() {
        let body = format!(
            "{}{}",
            row("A", "B", ["x", "2", "0", "0", "", "0", "0"]),
            row("C", "D", ["1", "2", "0", "0", "", "0", "0"])
        );
        let (records, stats) = parse(&body, IngestConfig::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team_a, "C");
        assert_eq!((stats.failed, stats.parsed, stats.total_rows), (1, 1, 2));
    }

    #[test]
    fn test_malformed_number_defaults_when_lenient() {
        let ingest = IngestConfig {
            malformed_numeric: MalformedPolicy::DefaultToZero,
            placeholder_team_names: true,
        };
        let body = row("A", "B", ["x", "2", "0", "0", "", "bad", "0"]);
        let (records, stats) = parse(&body, ingest);
        assert_eq!(stats.parsed, 1);
        assert_eq!(stats.defaulted_cells, 2);
        assert_eq!((records[0].m, records[0].r), (0.0, 0.0));
    }

    #[test]
    fn test_short_row_gets_placeholder_names() {
        let body = format!("{}only,two\n", row("A", "B", ["1", "0", "0", "0", "", "0", "0"]));
        let (records, _) = parse(&body, IngestConfig::default());
        assert_eq!(records[1].team_a, "队伍2A");
        assert_eq!(records[1].team_b, "队伍2B");

        let strict = IngestConfig {
            placeholder_team_names: false,
            ..IngestConfig::default()
        };
        let (records, _) = parse("x,y,Solo\n", strict);
        assert_eq!(records[0].team_a, "Solo");
        assert_eq!(records[0].team_b, "");
    }

    #[test]
    fn test_empty_cell_rows_are_kept() {
        let body = format!(",,,\n{}", row("A", "B", ["1", "0", "0", "0", "", "0", "0"]));
        let (records, stats) = parse(&body, IngestConfig::default());
        assert_eq!(records.len(), 2);
        assert_eq!((stats.parsed, stats.total_rows), (2, 2));
        assert_eq!((records[0].team_a.as_str(), records[0].team_b.as_str()), ("", ""));
        assert_eq!((records[0].m, records[0].n), (0.0, 0.0));
        assert_eq!(records[1].team_a, "A");
    }

    #[test]
    fn test_whitespace_row_gets_placeholder_names() {
        let (records, stats) = parse("   \n", IngestConfig::default());
        assert_eq!(stats.parsed, 1);
        assert_eq!(records[0].team_a, "队伍1A");
        assert_eq!(records[0].team_b, "队伍1B");
    }

    #[test]
    fn test_empty_lines_do_not_count_as_rows() {
        let body = format!("\n{}\n", row("A", "B", ["1", "0", "0", "0", "", "0", "0"]));
        let (records, stats) = parse(&body, IngestConfig::default());
        assert_eq!(records.len(), 1);
        assert_eq!(stats.total_rows, 1);
    }

    #[test]
    fn test_empty_and_header_only_input() {
        let (records, stats) =
            parse_reader("".as_bytes(), &ColumnLayout::default(), &IngestConfig::default())
                .unwrap();
        assert!(records.is_empty());
        assert_eq!(stats, ParseStats::default());

        let (records, _) = parse("", IngestConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = parse_csv(
            Path::new("/nonexistent/matches.csv"),
            &ColumnLayout::default(),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
