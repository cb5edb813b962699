//! Series loader: one raw per-source table in, one series per value column out.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use almanac_types::{AlmanacError, LoadOptions, LoadReport};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{Series, Value};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const CLOSE: &str = "Close";
const ADJ_CLOSE: &str = "Adj Close";

/// Result of loading one source table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    /// One series per value column, in column order. Not sorted or de-duplicated.
    pub series: Vec<Series>,
    /// Row counts and per-row parse failures.
    pub report: LoadReport,
}

/// Parse a date cell at calendar-day granularity.
///
/// Accepts `YYYY-MM-DD`, naive date-times (`T` or space separated, optional
/// fractional seconds), offset date-times and RFC 3339. Time of day is
/// discarded; for offset forms the date is the one written in the cell.
///
/// # Errors
/// Returns a description of the cell when none of the forms match.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("empty date cell".to_string());
    }
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            return Ok(d);
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Ok(dt.date());
        }
    }
    for f in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, f) {
            return Ok(dt.date_naive());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(format!("unparseable date '{s}'"))
}

/// Date column of a stacked `Price` / `Ticker` / `Date` header.
///
/// The first header row names the fields and its first cell is `Price`; the
/// dates sit in column 0. The `Ticker` and `Date` rows below it then fail date
/// parsing and are dropped like any other unparseable row.
fn stacked_header_date_column(headers: &csv::StringRecord) -> Option<usize> {
    headers
        .get(0)
        .is_some_and(|h| h.eq_ignore_ascii_case("Price"))
        .then_some(0)
}

/// Remove ticker decorations from a column name (`^GDAXI` -> `GDAXI`, `GC=F` -> `GC`).
#[must_use]
pub fn strip_ticker_decorations(name: &str) -> String {
    name.replace('^', "").replace("=F", "")
}

/// Load a table from in-memory CSV text.
///
/// # Errors
/// See [`load_table`].
pub fn load_str(
    source_id: &str,
    text: &str,
    opts: &LoadOptions,
) -> Result<LoadedTable, AlmanacError> {
    load_table(source_id, text.as_bytes(), opts)
}

/// Load a table from a CSV file.
///
/// # Errors
/// Returns `Io` if the file cannot be opened; otherwise see [`load_table`].
pub fn load_path(
    source_id: &str,
    path: &Path,
    opts: &LoadOptions,
) -> Result<LoadedTable, AlmanacError> {
    let file = File::open(path).map_err(|e| AlmanacError::io(path, e))?;
    load_table(source_id, file, opts)
}

/// Load a CSV table into one series per value column.
///
/// - Lines starting with `#` are skipped.
/// - The date column is found by name (case-insensitive); column order is free.
///   A header whose first cell is `Price` is read with its dates in column 0.
/// - With `adj_close_from_close`, a table that has `Close` but no `Adj Close`
///   also yields an `Adj Close` series holding the `Close` cells.
/// - Columns with an empty header are ignored.
/// - Rows whose date cannot be parsed are dropped and reported as `Parse` warnings.
/// - Short rows yield `Missing` for the absent cells.
///
/// # Errors
/// Returns `InvalidArg` if the header cannot be read, has no date column, or
/// names the same value column twice (after decoration stripping).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "almanac_core::load_table", skip(reader, opts))
)]
pub fn load_table<R: Read>(
    source_id: &str,
    reader: R,
    opts: &LoadOptions,
) -> Result<LoadedTable, AlmanacError> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AlmanacError::InvalidArg(format!("{source_id}: unreadable header: {e}")))?
        .clone();

    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(&opts.date_column))
        .or_else(|| stacked_header_date_column(&headers))
        .ok_or_else(|| {
            AlmanacError::InvalidArg(format!(
                "{source_id}: no '{}' column in header",
                opts.date_column
            ))
        })?;

    let mut value_cols: Vec<(usize, Series)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == date_idx || name.is_empty() {
            continue;
        }
        let metric = if opts.strip_ticker_decorations {
            strip_ticker_decorations(name)
        } else {
            name.to_string()
        };
        if value_cols.iter().any(|(_, s)| s.key.metric == metric) {
            return Err(AlmanacError::InvalidArg(format!(
                "{source_id}: duplicate column '{metric}'"
            )));
        }
        value_cols.push((idx, Series::new(source_id, metric)));
    }

    if opts.adj_close_from_close && !value_cols.iter().any(|(_, s)| s.key.metric == ADJ_CLOSE) {
        let close = value_cols
            .iter()
            .find(|(_, s)| s.key.metric == CLOSE)
            .map(|(idx, _)| *idx);
        if let Some(idx) = close {
            value_cols.push((idx, Series::new(source_id, ADJ_CLOSE)));
        }
    }

    let mut report = LoadReport {
        source_id: source_id.to_string(),
        series: value_cols.len(),
        ..LoadReport::default()
    };

    for record in rdr.records() {
        report.rows_read += 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map_or(0, |p| usize::try_from(p.line()).unwrap_or(0));
                report.rows_skipped += 1;
                report
                    .warnings
                    .push(AlmanacError::parse(source_id, line, e.to_string()));
                continue;
            }
        };
        let line = record
            .position()
            .map_or(0, |p| usize::try_from(p.line()).unwrap_or(0));

        let date = match parse_date(record.get(date_idx).unwrap_or_default()) {
            Ok(d) => d,
            Err(msg) => {
                report.rows_skipped += 1;
                report.warnings.push(AlmanacError::parse(source_id, line, msg));
                continue;
            }
        };

        for (idx, series) in &mut value_cols {
            let value = record.get(*idx).map_or(Value::Missing, Value::parse);
            series.push(date, value);
        }
    }

    #[cfg(feature = "tracing")]
    if report.rows_skipped > 0 {
        tracing::warn!(
            source = source_id,
            skipped = report.rows_skipped,
            read = report.rows_read,
            "dropped rows with unparseable dates"
        );
    }

    Ok(LoadedTable {
        series: value_cols.into_iter().map(|(_, s)| s).collect(),
        report,
    })
}
