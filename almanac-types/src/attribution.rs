//! Attribution types for averaged metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A run of consecutive axis dates [start..=end] a source observed.
///
/// Consecutive means adjacent on the shared axis, not adjacent calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive first date.
    pub start: NaiveDate,
    /// Inclusive last date.
    pub end: NaiveDate,
}

/// Which source contributed observations to which spans of an averaged metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Metric the attribution refers to.
    pub metric: String,
    /// Spans annotated by source identifier, in source order.
    pub spans: Vec<(String, Span)>,
}

impl Attribution {
    /// Create a new attribution container for a metric.
    #[must_use]
    pub const fn new(metric: String) -> Self {
        Self {
            metric,
            spans: vec![],
        }
    }

    /// Record a source span contribution.
    pub fn push(&mut self, source: impl Into<String>, span: Span) {
        self.spans.push((source.into(), span));
    }

    /// Spans contributed by one source.
    pub fn spans_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.spans
            .iter()
            .filter(move |(s, _)| s == source)
            .map(|(_, span)| *span)
    }
}
