//! Shared date axis construction and reindexing with provenance.

use crate::frame::{AlignedColumn, AlignedFrame, Cell, DateAxis};
use crate::types::{ResolvedSeries, Value};

/// Build the shared date axis for a set of series.
///
/// The axis is the sorted union of every date present in any input.
#[must_use]
pub fn union_axis(series: &[ResolvedSeries]) -> DateAxis {
    DateAxis::from_dates(
        series
            .iter()
            .flat_map(|s| s.observations().iter().map(|o| o.date)),
    )
}

/// Reindex every series onto the union of their dates.
///
/// - Numeric values become `Observed`.
/// - Absent dates, `Missing` values and non-numeric text become `Unobserved`;
///   text cells are counted in `text_cells_skipped`.
/// - Columns keep the input order.
///
/// When every input is empty the returned frame has an empty axis
/// (`AlignedFrame::is_empty`) and zero-length columns.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "almanac_core::align",
        skip(series),
        fields(series = series.len()),
    )
)]
#[must_use]
pub fn align(series: Vec<ResolvedSeries>) -> AlignedFrame {
    let axis = union_axis(&series);
    let mut text_cells_skipped = 0usize;

    let columns = series
        .into_iter()
        .map(|s| {
            let mut cells = vec![Cell::Unobserved; axis.len()];
            let mut cursor = 0usize;
            for o in s.observations() {
                // Observations and axis are both ascending, so a forward scan suffices.
                while axis.dates()[cursor] < o.date {
                    cursor += 1;
                }
                cells[cursor] = match &o.value {
                    Value::Number(v) => Cell::Observed(*v),
                    Value::Text(_) => {
                        text_cells_skipped += 1;
                        Cell::Unobserved
                    }
                    Value::Missing => Cell::Unobserved,
                };
            }
            AlignedColumn {
                key: s.into_inner().key,
                cells,
            }
        })
        .collect();

    #[cfg(feature = "tracing")]
    if axis.is_empty() {
        tracing::warn!("all inputs are empty; shared axis has no dates");
    }

    AlignedFrame {
        axis,
        columns,
        text_cells_skipped,
    }
}
