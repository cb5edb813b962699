use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use almanac_core::{AlmanacConfig, AlmanacError, FillPolicy, LoadOptions, PersistConfig};

use crate::pipeline::input::{SourceGroup, TableInput};

/// Orchestrator that turns registered per-source tables into one wide table.
#[derive(Debug, Clone)]
pub struct Almanac {
    pub(crate) groups: Vec<SourceGroup>,
    pub(crate) cfg: AlmanacConfig,
}

/// Builder for constructing an `Almanac` orchestrator with custom configuration.
#[derive(Debug, Clone)]
pub struct AlmanacBuilder {
    groups: Vec<SourceGroup>,
    cfg: AlmanacConfig,
}

impl Default for AlmanacBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlmanacBuilder {
    /// Create a new builder with default configuration and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: vec![],
            cfg: AlmanacConfig::default(),
        }
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn with_config(mut self, cfg: AlmanacConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Register tables whose same-named metrics are averaged across sources.
    ///
    /// Behavior and trade-offs:
    /// - Output columns are named `<namespace> <metric>` unless the metric is bare.
    /// - Only observed cells enter the average, so a source that lacks a date
    ///   never drags the mean toward a synthesized value.
    /// - Source identifiers must be unique within the group.
    #[must_use]
    pub fn average_group(mut self, namespace: impl Into<String>, inputs: Vec<TableInput>) -> Self {
        self.groups.push(SourceGroup {
            namespace: namespace.into(),
            inputs,
        });
        self
    }

    /// Register a single feature table whose columns join the wide table unchanged.
    #[must_use]
    pub fn feature_table(mut self, namespace: impl Into<String>, input: TableInput) -> Self {
        self.groups.push(SourceGroup {
            namespace: namespace.into(),
            inputs: vec![input],
        });
        self
    }

    /// Keep a metric's bare name instead of prefixing it with its namespace.
    #[must_use]
    pub fn bare_column(mut self, metric: impl Into<String>) -> Self {
        self.cfg.bare_columns.push(metric.into());
        self
    }

    /// Base name of the published files.
    #[must_use]
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.cfg.table_name = name.into();
        self
    }

    /// Directory that receives snapshots, `latest`, and the backup.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.output_dir = dir.into();
        self
    }

    /// Tolerance for the gap filler.
    #[must_use]
    pub const fn fill_policy(mut self, policy: FillPolicy) -> Self {
        self.cfg.fill = policy;
        self
    }

    /// Retry and backup settings for publishing `latest`.
    #[must_use]
    pub const fn persist(mut self, cfg: PersistConfig) -> Self {
        self.cfg.persist = cfg;
        self
    }

    /// Loader settings applied to every table.
    #[must_use]
    pub fn load_options(mut self, opts: LoadOptions) -> Self {
        self.cfg.load = opts;
        self
    }

    /// Overall deadline for [`Almanac::run_parallel`].
    ///
    /// When exceeded the run fails with `Timeout` and nothing is published.
    #[must_use]
    pub const fn parallel_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.parallel_timeout = Some(timeout);
        self
    }

    /// Build the `Almanac` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the configuration is invalid, no table was
    /// registered, a namespace is empty or registered twice, a group has no
    /// tables, or a group repeats a source identifier.
    pub fn build(self) -> Result<Almanac, AlmanacError> {
        self.cfg.validate()?;

        if self.groups.is_empty() {
            return Err(AlmanacError::InvalidArg(
                "no tables registered; add one via average_group(...) or feature_table(...)"
                    .to_string(),
            ));
        }

        let mut namespaces: HashSet<&str> = HashSet::new();
        for g in &self.groups {
            if g.namespace.trim().is_empty() {
                return Err(AlmanacError::InvalidArg("namespace must not be empty".into()));
            }
            if !namespaces.insert(g.namespace.as_str()) {
                return Err(AlmanacError::InvalidArg(format!(
                    "namespace '{}' registered twice",
                    g.namespace
                )));
            }
            if g.inputs.is_empty() {
                return Err(AlmanacError::InvalidArg(format!(
                    "group '{}' has no tables",
                    g.namespace
                )));
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for i in &g.inputs {
                if !seen.insert(i.source_id()) {
                    return Err(AlmanacError::InvalidArg(format!(
                        "group '{}' lists source '{}' twice",
                        g.namespace,
                        i.source_id()
                    )));
                }
            }
        }

        Ok(Almanac {
            groups: self.groups,
            cfg: self.cfg,
        })
    }
}

impl Almanac {
    /// Start building a new `Almanac` instance.
    ///
    /// ```rust,no_run
    /// use almanac::{Almanac, TableInput};
    ///
    /// let almanac = Almanac::builder()
    ///     .average_group(
    ///         "AVG",
    ///         vec![
    ///             TableInput::path("binance", "data/binance.csv"),
    ///             TableInput::path("kraken", "data/kraken.csv"),
    ///         ],
    ///     )
    ///     .feature_table("Fear Greed", TableInput::path("fng", "data/fear_greed.csv"))
    ///     .bare_column("BTC/USD")
    ///     .output_dir("datasets/combined_dataset")
    ///     .build()?;
    /// let report = almanac.run()?;
    /// println!("{} rows", report.assembly.rows);
    /// # Ok::<(), almanac::AlmanacError>(())
    /// ```
    #[must_use]
    pub fn builder() -> AlmanacBuilder {
        AlmanacBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &AlmanacConfig {
        &self.cfg
    }

    /// Registered groups, in registration order.
    #[must_use]
    pub fn groups(&self) -> &[SourceGroup] {
        &self.groups
    }

    pub(crate) fn output_name(&self, namespace: &str, metric: &str) -> String {
        if self.cfg.bare_columns.iter().any(|b| b == metric) {
            metric.to_string()
        } else {
            format!("{namespace} {metric}")
        }
    }
}
