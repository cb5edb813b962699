//! Report envelopes produced by the loader, the assembler, and the runner.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;
use crate::error::AlmanacError;

/// Summary of loading one source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoadReport {
    /// Source identifier the table was loaded under.
    pub source_id: String,
    /// Data rows read (comment lines excluded).
    pub rows_read: usize,
    /// Rows dropped because their date could not be parsed.
    pub rows_skipped: usize,
    /// Value columns turned into series.
    pub series: usize,
    /// One `Parse` entry per dropped row.
    pub warnings: Vec<AlmanacError>,
}

/// A metric that did not make it into the wide table, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedMetric {
    /// Output column name the metric would have had.
    pub column: String,
    /// Reason the metric was omitted.
    pub reason: AlmanacError,
}

/// A registered table that could not be loaded and was left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedLoad {
    /// Source identifier of the table.
    pub source_id: String,
    /// Namespace of the group the table was registered under.
    pub namespace: String,
    /// Why the table was skipped (`Io` or `InvalidArg`).
    pub reason: AlmanacError,
}

/// Summary of assembling a wide table, before publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssemblyReport {
    /// Number of rows (length of the shared date axis).
    pub rows: usize,
    /// Output columns in table order, excluding the date column.
    pub columns: Vec<String>,
    /// True if no input contributed any date; the table is header-only.
    pub empty_axis: bool,
    /// Representative spacing of the shared axis in days, if it has two or more dates.
    pub cadence_days: Option<i64>,
    /// Per-source load summaries in registration order.
    pub loads: Vec<LoadReport>,
    /// Tables skipped because they could not be read or had no date column.
    pub failed_loads: Vec<FailedLoad>,
    /// Metrics omitted from the table.
    pub dropped: Vec<DroppedMetric>,
    /// Value cells that held non-numeric text and were treated as unobserved.
    pub text_cells_skipped: usize,
    /// Per-metric source coverage for averaged columns.
    pub attributions: Vec<Attribution>,
}

/// Summary of a full aggregation run, including published artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunReport {
    /// Assembly summary.
    pub assembly: AssemblyReport,
    /// Timestamped snapshot written by this run.
    pub snapshot: Option<PathBuf>,
    /// Canonical `latest` file replaced by this run.
    pub latest: Option<PathBuf>,
    /// Copy of the previous `latest`, if one existed and was backed up.
    pub backup: Option<PathBuf>,
    /// Non-fatal issues encountered while publishing.
    pub warnings: Vec<AlmanacError>,
}
