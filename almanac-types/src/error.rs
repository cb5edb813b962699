use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reports::AssemblyReport;

/// Unified error type for the almanac workspace.
///
/// Per-metric conditions (`Parse`, `InsufficientData`, `DuplicateColumn`) are
/// collected into run reports and never abort sibling metrics. Run-level
/// conditions (`Persist`, `Io`, `InvalidArg`, ...) are surfaced to the caller.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlmanacError {
    /// A date or value cell could not be interpreted; the row or cell was dropped.
    #[error("parse error in {source_id} at line {line}: {msg}")]
    Parse {
        /// Identifier of the source table the cell came from.
        source_id: String,
        /// 1-based line number in the source table (0 when unknown).
        line: usize,
        /// Human-readable description of the offending cell.
        msg: String,
    },

    /// A metric had too few observed values to be filled.
    #[error("insufficient data for {metric}: {observed} of {total} cells observed")]
    InsufficientData {
        /// Output column (or series) name of the metric.
        metric: String,
        /// Number of observed cells on the shared axis.
        observed: usize,
        /// Length of the shared axis.
        total: usize,
    },

    /// Publishing the `latest` table failed after all retry attempts.
    #[error("failed to publish {path} after {attempts} attempts: {msg}")]
    Persist {
        /// Path of the `latest` file that could not be replaced.
        path: String,
        /// Number of replace attempts made.
        attempts: u32,
        /// Snapshot written earlier in the run, usable in place of `latest`.
        fallback: Option<String>,
        /// Last underlying failure.
        msg: String,
        /// Assembly summary of the run whose publication failed, when known.
        assembly: Option<Box<AssemblyReport>>,
    },

    /// Two metrics resolved to the same output column name; the later one was dropped.
    #[error("duplicate output column: {column}")]
    DuplicateColumn {
        /// The colliding output column name.
        column: String,
    },

    /// Invalid input argument, configuration value, or table shape.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Filesystem failure while reading inputs or writing outputs.
    #[error("io error on {path}: {msg}")]
    Io {
        /// Path involved in the failing operation.
        path: String,
        /// Underlying error message.
        msg: String,
    },

    /// Issues with data contents that are not attributable to a single cell.
    #[error("data issue: {0}")]
    Data(String),

    /// A parallel worker failed to complete (panicked or was cancelled).
    #[error("worker failed: {0}")]
    Join(String),

    /// The overall run exceeded the configured deadline.
    #[error("run timed out: {stage}")]
    Timeout {
        /// Stage label that was running when the deadline elapsed.
        stage: String,
    },
}

impl AlmanacError {
    /// Helper: build a `Parse` error.
    pub fn parse(source_id: impl Into<String>, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            source_id: source_id.into(),
            line,
            msg: msg.into(),
        }
    }

    /// Helper: build an `InsufficientData` error.
    pub fn insufficient(metric: impl Into<String>, observed: usize, total: usize) -> Self {
        Self::InsufficientData {
            metric: metric.into(),
            observed,
            total,
        }
    }

    /// Helper: build an `Io` error from a path and any displayable failure.
    pub fn io(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Helper: build a `Timeout` error for a stage label.
    #[must_use]
    pub fn timeout(stage: impl Into<String>) -> Self {
        Self::Timeout {
            stage: stage.into(),
        }
    }

    /// Returns true if the error only disqualifies a single metric or cell and
    /// the run as a whole may continue.
    #[must_use]
    pub const fn is_metric_local(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InsufficientData { .. } | Self::DuplicateColumn { .. }
        )
    }

    /// Attach the assembly summary to a `Persist` error; other variants are returned unchanged.
    #[must_use]
    pub fn with_assembly(self, report: AssemblyReport) -> Self {
        match self {
            Self::Persist {
                path,
                attempts,
                fallback,
                msg,
                ..
            } => Self::Persist {
                path,
                attempts,
                fallback,
                msg,
                assembly: Some(Box::new(report)),
            },
            other => other,
        }
    }

    /// Returns the assembly summary carried by a `Persist` error.
    #[must_use]
    pub fn assembly(&self) -> Option<&AssemblyReport> {
        match self {
            Self::Persist { assembly, .. } => assembly.as_deref(),
            _ => None,
        }
    }

    /// Returns the fallback artifact path carried by a `Persist` error.
    #[must_use]
    pub fn fallback_artifact(&self) -> Option<&str> {
        match self {
            Self::Persist { fallback, .. } => fallback.as_deref(),
            _ => None,
        }
    }
}
