//! Aggregation pipeline: load, resolve, align, average, fill, assemble, publish.
//!
//! The sequential path (`assemble`, `run`) and the parallel path
//! (`run_parallel`) share every stage function below, so both produce the same
//! table bytes for the same inputs.

pub mod input;
pub(crate) mod metrics;
mod parallel;
pub mod persist;
pub mod table;
pub(crate) mod util;

use std::collections::HashSet;

use almanac_core::{
    AlignedFrame, AlmanacError, AssemblyReport, DateAxis, DroppedMetric, FailedLoad, LoadReport,
    LoadedTable, RunReport, Series, align, estimate_step_days, resolve_duplicates,
};
use chrono::NaiveDateTime;

use crate::core::Almanac;
use input::SourceGroup;
use metrics::{MetricJob, MetricOutcome};
use persist::Published;
use table::WideTable;

/// Series of every loaded table, each tagged with its group index.
pub(crate) struct Staged {
    pub series: Vec<Series>,
    pub owners: Vec<usize>,
    pub loads: Vec<LoadReport>,
    pub failed: Vec<FailedLoad>,
}

/// Merge per-table load results, in registration order.
///
/// A table that cannot be loaded is recorded in `failed` and contributes no
/// series; the remaining tables still make up the run.
pub(crate) fn stage_loads(
    groups: &[SourceGroup],
    results: Vec<(usize, String, Result<LoadedTable, AlmanacError>)>,
) -> Staged {
    let mut staged = Staged {
        series: Vec::new(),
        owners: Vec::new(),
        loads: Vec::with_capacity(results.len()),
        failed: Vec::new(),
    };
    for (group, source_id, res) in results {
        match res {
            Ok(loaded) => {
                staged.owners.extend(std::iter::repeat_n(group, loaded.series.len()));
                staged.series.extend(loaded.series);
                staged.loads.push(loaded.report);
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(source = %source_id, %reason, "table skipped");
                staged.failed.push(FailedLoad {
                    source_id,
                    namespace: groups[group].namespace.clone(),
                    reason,
                });
            }
        }
    }
    staged
}

/// Fold metric outcomes into the wide table, recording drops and attributions.
pub(crate) fn finish(
    axis: DateAxis,
    outcomes: Vec<MetricOutcome>,
    report: &mut AssemblyReport,
) -> WideTable {
    let mut table = WideTable::new(axis);
    for outcome in outcomes {
        let pushed = outcome.result.and_then(|col| {
            let values = col.values().ok_or_else(|| {
                AlmanacError::Data(format!("column {} still has gaps", outcome.column))
            })?;
            table.push_column(outcome.column.as_str(), values)
        });
        match pushed {
            Ok(()) => {
                report.columns.push(outcome.column);
                if let Some(attr) = outcome.attribution {
                    report.attributions.push(attr);
                }
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(column = %outcome.column, %reason, "metric omitted from table");
                report.dropped.push(DroppedMetric {
                    column: outcome.column,
                    reason,
                });
            }
        }
    }
    table
}

impl Almanac {
    /// Turn an aligned frame into per-column jobs.
    ///
    /// Columns are ordered by group registration, then by first appearance of
    /// the metric within the group. A job whose output name was already taken
    /// is dropped with `DuplicateColumn`.
    pub(crate) fn plan_metrics(
        &self,
        frame: AlignedFrame,
        owners: &[usize],
        report: &mut AssemblyReport,
    ) -> (DateAxis, Vec<MetricJob>) {
        let AlignedFrame {
            axis,
            columns,
            text_cells_skipped,
        } = frame;
        report.rows = axis.len();
        report.empty_axis = axis.is_empty();
        report.cadence_days = estimate_step_days(&axis);
        report.text_cells_skipped = text_cells_skipped;

        let mut per_group: Vec<Vec<MetricJob>> = vec![Vec::new(); self.groups.len()];
        for (col, &g) in columns.into_iter().zip(owners) {
            let group = &self.groups[g];
            let jobs = &mut per_group[g];
            if let Some(job) = jobs.iter_mut().find(|j| j.metric == col.key.metric) {
                job.sources.push(col);
            } else {
                jobs.push(MetricJob {
                    column: self.output_name(&group.namespace, &col.key.metric),
                    namespace: group.namespace.clone(),
                    metric: col.key.metric.clone(),
                    averaged: group.is_averaged(),
                    sources: vec![col],
                });
            }
        }

        let mut taken: HashSet<String> = HashSet::new();
        let mut jobs = Vec::new();
        for job in per_group.into_iter().flatten() {
            if taken.insert(job.column.clone()) {
                jobs.push(job);
            } else {
                #[cfg(feature = "tracing")]
                tracing::warn!(column = %job.column, "duplicate output column dropped");
                report.dropped.push(DroppedMetric {
                    reason: AlmanacError::DuplicateColumn {
                        column: job.column.clone(),
                    },
                    column: job.column,
                });
            }
        }
        (axis, jobs)
    }

    /// Build the wide table without publishing it.
    ///
    /// Metric-level failures (`InsufficientData`, `DuplicateColumn`) are
    /// recorded in the report and never abort the other metrics. A table that
    /// cannot be read, or has no date column, is listed in `failed_loads`.
    ///
    /// # Errors
    /// None at present: load failures land in `failed_loads` instead.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "almanac::pipeline::assemble",
            skip(self),
            fields(groups = self.groups.len()),
        )
    )]
    pub fn assemble(&self) -> Result<(WideTable, AssemblyReport), AlmanacError> {
        let results = self
            .groups
            .iter()
            .enumerate()
            .flat_map(|(g, group)| group.inputs.iter().map(move |i| (g, i)))
            .map(|(g, input)| {
                (g, input.source_id().to_string(), input.load(&self.cfg.load))
            })
            .collect();
        let staged = stage_loads(&self.groups, results);

        let resolved = staged.series.into_iter().map(resolve_duplicates).collect();
        let frame = align(resolved);

        let mut report = AssemblyReport {
            loads: staged.loads,
            failed_loads: staged.failed,
            ..AssemblyReport::default()
        };
        let (axis, jobs) = self.plan_metrics(frame, &staged.owners, &mut report);
        let outcomes = jobs
            .into_iter()
            .map(|job| job.compute(&axis, &self.cfg.fill))
            .collect();
        let table = finish(axis, outcomes, &mut report);
        Ok((table, report))
    }

    /// Assemble and publish, stamping the snapshot with the local wall clock.
    ///
    /// # Errors
    /// See [`run_at`](Self::run_at).
    pub fn run(&self) -> Result<RunReport, AlmanacError> {
        self.run_at(chrono::Local::now().naive_local())
    }

    /// Assemble and publish, stamping the snapshot with `now`.
    ///
    /// # Errors
    /// - `Io` / `InvalidArg` if the snapshot cannot be written.
    /// - `Persist` if `latest` could not be replaced; the snapshot path is the
    ///   fallback and the assembly summary is attached.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "almanac::pipeline::run", skip(self))
    )]
    pub fn run_at(&self, now: NaiveDateTime) -> Result<RunReport, AlmanacError> {
        let (table, assembly) = self.assemble()?;
        match self.publish_table(&table, &self.cfg.table_name, now) {
            Ok(published) => Ok(run_report(assembly, published)),
            Err(e) => Err(e.with_assembly(assembly)),
        }
    }

    /// Publish any wide table into the configured output directory under `table_name`.
    ///
    /// Useful for derived tables, e.g. a [`WideTable::select_columns`] projection.
    ///
    /// # Errors
    /// See [`persist::publish`].
    pub fn publish_table(
        &self,
        table: &WideTable,
        table_name: &str,
        now: NaiveDateTime,
    ) -> Result<Published, AlmanacError> {
        let bytes = table.to_csv_bytes()?;
        persist::publish(
            &bytes,
            &self.cfg.output_dir,
            table_name,
            &self.cfg.persist,
            now,
        )
    }
}

pub(crate) fn run_report(assembly: AssemblyReport, published: Published) -> RunReport {
    RunReport {
        assembly,
        snapshot: Some(published.snapshot),
        latest: Some(published.latest),
        backup: published.backup,
        warnings: published.warnings,
    }
}
