//! Cross-source averaging over observed cells, with per-source attribution.

use almanac_types::{AlmanacError, Attribution, Span};

use crate::frame::{AlignedColumn, Cell, DateAxis};
use crate::types::SeriesKey;

/// Merge same-metric columns from several sources into one column.
///
/// Each merged cell is the arithmetic mean of the sources' `Observed` cells
/// at that date, summed in source order. `Filled` cells never contribute; a
/// date that no source observed stays `Unobserved`.
///
/// # Errors
/// Returns `Err(AlmanacError::Data)` if the columns do not all have the same length.
pub fn average_observed(
    key: SeriesKey,
    columns: &[AlignedColumn],
) -> Result<AlignedColumn, AlmanacError> {
    let len = columns.first().map_or(0, |c| c.cells.len());
    if let Some(bad) = columns.iter().find(|c| c.cells.len() != len) {
        return Err(AlmanacError::Data(format!(
            "column {} has {} cells, expected {len}",
            bad.key,
            bad.cells.len()
        )));
    }

    let cells = (0..len)
        .map(|i| {
            let observed: Vec<f64> = columns
                .iter()
                .filter_map(|c| c.cells[i].observed())
                .collect();
            finite_mean(&observed).map_or(Cell::Unobserved, Cell::Observed)
        })
        .collect();

    Ok(AlignedColumn { key, cells })
}

/// Arithmetic mean of finite values; `None` when `values` is empty.
///
/// Falls back to summing `v / n` when the plain sum overflows, so the mean of
/// finite values is always finite.
pub(crate) fn finite_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Like [`average_observed`], also returning which source observed which spans.
///
/// # Errors
/// Returns `Err(AlmanacError::Data)` if a column length differs from the axis length.
pub fn average_with_attribution(
    key: SeriesKey,
    axis: &DateAxis,
    columns: &[AlignedColumn],
) -> Result<(AlignedColumn, Attribution), AlmanacError> {
    if let Some(bad) = columns.iter().find(|c| c.cells.len() != axis.len()) {
        return Err(AlmanacError::Data(format!(
            "column {} has {} cells, axis has {}",
            bad.key,
            bad.cells.len(),
            axis.len()
        )));
    }
    let mut attribution = Attribution::new(key.metric.clone());
    for c in columns {
        for span in observed_spans(axis, c) {
            attribution.push(c.key.source.clone(), span);
        }
    }
    let merged = average_observed(key, columns)?;
    Ok((merged, attribution))
}

/// Maximal runs of consecutive observed cells, as date spans.
///
/// # Panics
/// Panics if `column` has more cells than `axis` has dates.
#[must_use]
pub fn observed_spans(axis: &DateAxis, column: &AlignedColumn) -> Vec<Span> {
    let dates = axis.dates();
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (i, cell) in column.cells.iter().enumerate() {
        match (cell.is_observed(), open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                spans.push(Span {
                    start: dates[start],
                    end: dates[i - 1],
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        spans.push(Span {
            start: dates[start],
            end: dates[column.cells.len() - 1],
        });
    }
    spans
}
