//! Shared date axis and provenance-tagged columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::SeriesKey;

/// A cell on the shared date axis, tagged with where its value came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Value taken from a source table.
    Observed(f64),
    /// Value synthesized by the gap filler.
    Filled(f64),
    /// No value yet.
    Unobserved,
}

impl Cell {
    /// Value of an observed or filled cell.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Observed(v) | Self::Filled(v) => Some(v),
            Self::Unobserved => None,
        }
    }

    /// Value of an observed cell only.
    #[must_use]
    pub const fn observed(self) -> Option<f64> {
        match self {
            Self::Observed(v) => Some(v),
            _ => None,
        }
    }

    /// True for `Observed`.
    #[must_use]
    pub const fn is_observed(self) -> bool {
        matches!(self, Self::Observed(_))
    }

    /// True for `Unobserved`.
    #[must_use]
    pub const fn is_unobserved(self) -> bool {
        matches!(self, Self::Unobserved)
    }
}

/// Strictly ascending list of distinct calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    /// Build an axis from any dates; they are sorted and de-duplicated.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    /// The dates in ascending order.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if the axis holds no date.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of `date` on the axis.
    #[must_use]
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }
}

/// One series reindexed onto a shared axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedColumn {
    /// Identity of the series (or of the merged metric).
    pub key: SeriesKey,
    /// One cell per axis date.
    pub cells: Vec<Cell>,
}

impl AlignedColumn {
    /// A column of `len` unobserved cells.
    #[must_use]
    pub fn unobserved(key: SeriesKey, len: usize) -> Self {
        Self {
            key,
            cells: vec![Cell::Unobserved; len],
        }
    }

    /// Number of observed cells.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_observed()).count()
    }

    /// True if every cell carries a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| !c.is_unobserved())
    }

    /// Values of every cell, or `None` if any cell is still unobserved.
    #[must_use]
    pub fn values(&self) -> Option<Vec<f64>> {
        self.cells.iter().map(|c| c.value()).collect()
    }
}

/// A set of columns sharing one date axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedFrame {
    /// Shared axis.
    pub axis: DateAxis,
    /// Columns in input order; each has `axis.len()` cells.
    pub columns: Vec<AlignedColumn>,
    /// Value cells holding non-numeric text that were aligned as unobserved.
    pub text_cells_skipped: usize,
}

impl AlignedFrame {
    /// True when no input contributed any date.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Column for a key, if present.
    #[must_use]
    pub fn column(&self, key: &SeriesKey) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| &c.key == key)
    }
}
