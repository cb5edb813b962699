//! Series data model: raw values, observations, and named series.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw cell value as read from a source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A finite real number.
    Number(f64),
    /// Non-numeric content (kept so duplicate resolution can fall back to first-seen).
    Text(String),
    /// Empty cell or an explicit missing marker (`nan`, `null`, ...).
    Missing,
}

const MISSING_MARKERS: &[&str] = &["nan", "null", "none", "nat", "n/a", "na"];

impl Value {
    /// Interpret a raw cell.
    ///
    /// Empty cells and missing markers map to `Missing`; finite numbers to
    /// `Number`; everything else, including `inf`, to `Text`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let t = raw.trim();
        if t.is_empty() || MISSING_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m)) {
            return Self::Missing;
        }
        match t.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(t.to_string()),
        }
    }

    /// Numeric payload, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// True for `Missing`.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// One dated value of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day of the observation.
    pub date: NaiveDate,
    /// Observed value.
    pub value: Value,
}

/// Identity of a series: the source it came from and the metric it measures.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Source identifier, e.g. an exchange or feature-table name.
    pub source: String,
    /// Metric (column) name within the source, e.g. `Close`.
    pub metric: String,
}

impl SeriesKey {
    /// Build a key from a source identifier and metric name.
    pub fn new(source: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            metric: metric.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.source, self.metric)
    }
}

/// A named sequence of observations, possibly unsorted and with repeated dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series identity.
    pub key: SeriesKey,
    /// Observations in arrival order.
    pub observations: Vec<Observation>,
}

impl Series {
    /// Create an empty series.
    pub fn new(source: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            key: SeriesKey::new(source, metric),
            observations: Vec::new(),
        }
    }

    /// Append an observation.
    pub fn push(&mut self, date: NaiveDate, value: Value) {
        self.observations.push(Observation { date, value });
    }

    /// Builder-style variant of [`push`](Self::push) for a numeric value.
    #[must_use]
    pub fn with(mut self, date: NaiveDate, value: f64) -> Self {
        self.push(date, Value::Number(value));
        self
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if the series holds no observation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// A series with exactly one observation per date, sorted ascending.
///
/// Only produced by [`resolve_duplicates`](crate::timeseries::dedup::resolve_duplicates),
/// so alignment can rely on the date -> value bijection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSeries(pub(crate) Series);

impl ResolvedSeries {
    /// Series identity.
    #[must_use]
    pub const fn key(&self) -> &SeriesKey {
        &self.0.key
    }

    /// Observations, strictly ascending by date.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.0.observations
    }

    /// Value recorded for `date`, if the date is present.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&Value> {
        self.0
            .observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| &self.0.observations[i].value)
    }

    /// Unwrap into the underlying series.
    #[must_use]
    pub fn into_inner(self) -> Series {
        self.0
    }
}
