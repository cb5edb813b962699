use almanac_core::{
    AlignedColumn, AlmanacError, Attribution, DateAxis, FillPolicy, SeriesKey,
    average_with_attribution, fill_gaps,
};

/// One output column waiting to be averaged and filled.
#[derive(Debug, Clone)]
pub(crate) struct MetricJob {
    pub column: String,
    pub namespace: String,
    pub metric: String,
    pub averaged: bool,
    pub sources: Vec<AlignedColumn>,
}

/// Result of running a [`MetricJob`].
#[derive(Debug, Clone)]
pub(crate) struct MetricOutcome {
    pub column: String,
    pub result: Result<AlignedColumn, AlmanacError>,
    pub attribution: Option<Attribution>,
}

impl MetricJob {
    /// Average (for multi-source groups) and fill one metric.
    ///
    /// Failures stay inside the outcome so sibling metrics are unaffected.
    pub(crate) fn compute(self, axis: &DateAxis, policy: &FillPolicy) -> MetricOutcome {
        let key = SeriesKey::new(self.namespace.as_str(), self.metric.as_str());
        let (merged, attribution) = if self.averaged {
            match average_with_attribution(key, axis, &self.sources) {
                Ok((col, attr)) => (col, Some(attr)),
                Err(e) => {
                    return MetricOutcome {
                        column: self.column,
                        result: Err(e),
                        attribution: None,
                    };
                }
            }
        } else {
            match self.sources.into_iter().next() {
                Some(col) => (col, None),
                None => {
                    return MetricOutcome {
                        result: Err(AlmanacError::Data(format!(
                            "metric {} has no source column",
                            self.column
                        ))),
                        column: self.column,
                        attribution: None,
                    };
                }
            }
        };

        // An empty axis yields a header-only table; there is nothing to fill.
        let result = if axis.is_empty() {
            Ok(merged)
        } else {
            fill_gaps(axis, merged, policy).map_err(|e| match e {
                AlmanacError::InsufficientData {
                    observed, total, ..
                } => AlmanacError::insufficient(self.column.as_str(), observed, total),
                other => other,
            })
        };

        MetricOutcome {
            column: self.column,
            result,
            attribution,
        }
    }
}
