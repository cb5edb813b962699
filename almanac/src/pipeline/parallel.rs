use std::sync::Arc;
use std::time::Duration;

use almanac_core::{AlmanacError, AssemblyReport, RunReport, align, resolve_duplicates};
use chrono::NaiveDateTime;
use tokio::task::{JoinError, spawn_blocking};
use tokio::time::Instant;

use super::table::WideTable;
use super::util::join_with_deadline;
use super::{finish, persist, run_report, stage_loads};
use crate::core::Almanac;

fn join_err(e: JoinError) -> AlmanacError {
    AlmanacError::Join(e.to_string())
}

fn collect_joined<T>(joined: Vec<Result<T, JoinError>>) -> Result<Vec<T>, AlmanacError> {
    joined.into_iter().map(|r| r.map_err(join_err)).collect()
}

fn remaining(deadline: Option<Duration>, started: Instant) -> Option<Duration> {
    deadline.map(|d| d.saturating_sub(started.elapsed()))
}

impl Almanac {
    /// Like [`assemble`](Self::assemble), fanning independent work out to the
    /// Tokio blocking pool.
    ///
    /// Tables are loaded, series resolved, and metrics averaged and filled
    /// concurrently; results are joined in registration order, so the table is
    /// identical to the sequential one. The configured `parallel_timeout`
    /// bounds the whole assembly.
    ///
    /// # Errors
    /// - `Timeout` if the deadline elapses; the label names the stage.
    /// - `Join` if a worker panicked.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "almanac::pipeline::assemble_parallel",
            skip(self),
            fields(groups = self.groups.len()),
        )
    )]
    pub async fn assemble_parallel(&self) -> Result<(WideTable, AssemblyReport), AlmanacError> {
        let started = Instant::now();
        let deadline = self.cfg.parallel_timeout;

        let loads = self
            .groups
            .iter()
            .enumerate()
            .flat_map(|(g, group)| group.inputs.iter().map(move |i| (g, i.clone())))
            .map(|(g, input)| {
                let opts = self.cfg.load.clone();
                spawn_blocking(move || {
                    let loaded = input.load(&opts);
                    (g, input.source_id().to_string(), loaded)
                })
            });
        let joined = join_with_deadline(loads, remaining(deadline, started), "load").await?;
        let staged = stage_loads(&self.groups, collect_joined(joined)?);

        let resolving = staged
            .series
            .into_iter()
            .map(|s| spawn_blocking(move || resolve_duplicates(s)));
        let joined = join_with_deadline(resolving, remaining(deadline, started), "resolve").await?;
        let frame = align(collect_joined(joined)?);

        let mut report = AssemblyReport {
            loads: staged.loads,
            failed_loads: staged.failed,
            ..AssemblyReport::default()
        };
        let (axis, jobs) = self.plan_metrics(frame, &staged.owners, &mut report);

        let axis = Arc::new(axis);
        let policy = self.cfg.fill;
        let computing = jobs.into_iter().map(|job| {
            let axis = Arc::clone(&axis);
            spawn_blocking(move || job.compute(&axis, &policy))
        });
        let joined = join_with_deadline(computing, remaining(deadline, started), "fill").await?;
        let outcomes = collect_joined(joined)?;

        let axis = Arc::try_unwrap(axis).unwrap_or_else(|shared| (*shared).clone());
        let table = finish(axis, outcomes, &mut report);
        Ok((table, report))
    }

    /// Parallel counterpart of [`run`](Self::run).
    ///
    /// # Errors
    /// See [`run_parallel_at`](Self::run_parallel_at).
    pub async fn run_parallel(&self) -> Result<RunReport, AlmanacError> {
        self.run_parallel_at(chrono::Local::now().naive_local()).await
    }

    /// Parallel counterpart of [`run_at`](Self::run_at).
    ///
    /// Publication runs on the blocking pool after assembly and is not
    /// subject to the deadline, so a timed-out run never leaves a partial
    /// `latest` behind.
    ///
    /// # Errors
    /// Errors of [`assemble_parallel`](Self::assemble_parallel) and of
    /// [`persist::publish`].
    pub async fn run_parallel_at(&self, now: NaiveDateTime) -> Result<RunReport, AlmanacError> {
        let (table, assembly) = self.assemble_parallel().await?;
        let bytes = table.to_csv_bytes()?;
        let dir = self.cfg.output_dir.clone();
        let name = self.cfg.table_name.clone();
        let cfg = self.cfg.persist;
        let published = spawn_blocking(move || persist::publish(&bytes, &dir, &name, &cfg, now))
            .await
            .map_err(join_err)?;
        match published {
            Ok(published) => Ok(run_report(assembly, published)),
            Err(e) => Err(e.with_assembly(assembly)),
        }
    }
}
