//! Registered source tables and their namespace groups.

use std::path::PathBuf;

use almanac_core::{AlmanacError, LoadOptions, LoadedTable, load_path, load_str};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Path(PathBuf),
    Text(String),
}

/// One per-source table registered with the orchestrator.
///
/// A table is read either from a CSV file or from CSV text already in memory.
/// Columns listed via [`exclude`](Self::exclude) are dropped after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInput {
    source_id: String,
    origin: Origin,
    excluded: Vec<String>,
}

impl TableInput {
    /// A table stored in a CSV file.
    pub fn path(source_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            origin: Origin::Path(path.into()),
            excluded: Vec::new(),
        }
    }

    /// A table given as CSV text.
    pub fn text(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            origin: Origin::Text(text.into()),
            excluded: Vec::new(),
        }
    }

    /// Drop a value column (matched on the loaded metric name).
    #[must_use]
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.excluded.push(column.into());
        self
    }

    /// Source identifier the table's series are keyed under.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Read and parse the table, then drop excluded columns.
    pub(crate) fn load(&self, opts: &LoadOptions) -> Result<LoadedTable, AlmanacError> {
        let mut loaded = match &self.origin {
            Origin::Path(p) => load_path(&self.source_id, p, opts)?,
            Origin::Text(t) => load_str(&self.source_id, t, opts)?,
        };
        if !self.excluded.is_empty() {
            loaded
                .series
                .retain(|s| !self.excluded.iter().any(|x| x == &s.key.metric));
            loaded.report.series = loaded.series.len();
        }
        Ok(loaded)
    }
}

/// A namespace and the tables whose same-named metrics it merges.
///
/// A group with one input contributes that table's columns as-is; with more
/// inputs, each metric is the cross-source average of observed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub(crate) namespace: String,
    pub(crate) inputs: Vec<TableInput>,
}

impl SourceGroup {
    /// Namespace used as the output column prefix.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registered tables, in registration order.
    #[must_use]
    pub fn inputs(&self) -> &[TableInput] {
        &self.inputs
    }

    pub(crate) const fn is_averaged(&self) -> bool {
        self.inputs.len() > 1
    }
}
