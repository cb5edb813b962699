//! Configuration types shared by the loader, the fill stage, and the persister.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AlmanacError;

/// Tolerance applied by the gap filler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// Largest fraction of unobserved cells (in `[0, 1]`) a column may have
    /// and still be filled. Columns above the bound are dropped as
    /// insufficient. `1.0` only rejects columns with no observation at all.
    pub max_missing_fraction: f64,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            max_missing_fraction: 1.0,
        }
    }
}

impl FillPolicy {
    /// Validate the tolerance bound.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `max_missing_fraction` is not a finite value in `[0, 1]`.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        let f = self.max_missing_fraction;
        if !f.is_finite() || !(0.0..=1.0).contains(&f) {
            return Err(AlmanacError::InvalidArg(format!(
                "max_missing_fraction must be within [0, 1], got {f}"
            )));
        }
        Ok(())
    }
}

/// Bounded-retry settings for publishing the `latest` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Maximum number of rename attempts (>= 1).
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub retry_delay: Duration,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
    /// Copy the previous `latest` to `<name>_backup.csv` before replacing it.
    pub keep_backup: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(1),
            jitter_percent: 20,
            keep_backup: true,
        }
    }
}

/// How raw per-source tables are interpreted by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Name of the date column, matched case-insensitively.
    pub date_column: String,
    /// Strip ticker decorations from column names (`^GDAXI` -> `GDAXI`, `GC=F` -> `GC`).
    pub strip_ticker_decorations: bool,
    /// Add an `Adj Close` series copied from `Close` when a table has no `Adj Close`.
    #[serde(default)]
    pub adj_close_from_close: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            strip_ticker_decorations: false,
            adj_close_from_close: false,
        }
    }
}

/// Global configuration for an aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlmanacConfig {
    /// Base name of the published table (`<name>_latest.csv`, snapshots, backup).
    pub table_name: String,
    /// Directory receiving snapshots and the `latest` file.
    pub output_dir: PathBuf,
    /// Loader settings applied to every source.
    pub load: LoadOptions,
    /// Gap filler tolerance.
    pub fill: FillPolicy,
    /// Publication retry settings.
    pub persist: PersistConfig,
    /// Metric names that keep their bare name instead of `<namespace> <metric>`.
    pub bare_columns: Vec<String>,
    /// Optional deadline for the parallel runner.
    pub parallel_timeout: Option<Duration>,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            table_name: "combined_dataset".to_string(),
            output_dir: PathBuf::from("datasets").join("combined_dataset"),
            load: LoadOptions::default(),
            fill: FillPolicy::default(),
            persist: PersistConfig::default(),
            bare_columns: Vec::new(),
            parallel_timeout: None,
        }
    }
}

impl AlmanacConfig {
    /// Validate the configuration as a whole.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty table name or date column, an
    /// out-of-range fill tolerance, or zero persist attempts.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        if self.table_name.trim().is_empty() {
            return Err(AlmanacError::InvalidArg("table name must not be empty".into()));
        }
        if self
            .table_name
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0')
        {
            return Err(AlmanacError::InvalidArg(format!(
                "table name must be a plain file stem, got '{}'",
                self.table_name
            )));
        }
        if self.load.date_column.trim().is_empty() {
            return Err(AlmanacError::InvalidArg("date column must not be empty".into()));
        }
        if self.persist.max_attempts == 0 {
            return Err(AlmanacError::InvalidArg("persist.max_attempts must be >= 1".into()));
        }
        if self.persist.jitter_percent > 100 {
            return Err(AlmanacError::InvalidArg(
                "persist.jitter_percent must be within [0, 100]".into(),
            ));
        }
        self.fill.validate()
    }
}
