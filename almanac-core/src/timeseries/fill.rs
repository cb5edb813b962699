//! Gap filling: date interpolation, then edge fills, under a missing-fraction tolerance.

use almanac_types::{AlmanacError, FillPolicy};
use chrono::Datelike;

use crate::frame::{AlignedColumn, Cell, DateAxis};
use crate::timeseries::coverage::missing_fraction;

/// Fill every `Unobserved` cell of a column, leaving `Observed` cells untouched.
///
/// Order of application:
/// 1. linear interpolation between the nearest observed neighbours, using the
///    calendar day as the coordinate (uneven axis spacing is honoured);
/// 2. backward-fill of the leading gap from the first observed value;
/// 3. forward-fill of the trailing gap from the last observed value.
///
/// Cells that are already `Filled` are kept as-is and never used as anchors.
///
/// # Errors
/// - `InsufficientData` if the column has no observed cell, or if its
///   unobserved fraction exceeds `policy.max_missing_fraction`.
/// - `Data` if the column length differs from the axis length.
pub fn fill_gaps(
    axis: &DateAxis,
    mut column: AlignedColumn,
    policy: &FillPolicy,
) -> Result<AlignedColumn, AlmanacError> {
    if column.cells.len() != axis.len() {
        return Err(AlmanacError::Data(format!(
            "column {} has {} cells, axis has {}",
            column.key,
            column.cells.len(),
            axis.len()
        )));
    }

    let total = column.cells.len();
    let anchors: Vec<usize> = column
        .cells
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.is_observed().then_some(i))
        .collect();
    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        return Err(AlmanacError::insufficient(column.key.to_string(), 0, total));
    };
    if missing_fraction(&column.cells) > policy.max_missing_fraction {
        return Err(AlmanacError::insufficient(
            column.key.to_string(),
            anchors.len(),
            total,
        ));
    }

    let day = |i: usize| f64::from(axis.dates()[i].num_days_from_ce());
    let value_at = |cells: &[Cell], i: usize| cells[i].observed().unwrap_or_default();

    for pair in anchors.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (a, b) = (value_at(&column.cells, lo), value_at(&column.cells, hi));
        let span = day(hi) - day(lo);
        for k in lo + 1..hi {
            if column.cells[k].is_unobserved() {
                let w = (day(k) - day(lo)) / span;
                let mut v = a + (b - a) * w;
                if !v.is_finite() {
                    // `b - a` overflowed; blend the endpoints instead.
                    v = a * (1.0 - w) + b * w;
                }
                column.cells[k] = Cell::Filled(v);
            }
        }
    }

    let head = value_at(&column.cells, first);
    for cell in &mut column.cells[..first] {
        if cell.is_unobserved() {
            *cell = Cell::Filled(head);
        }
    }
    let tail = value_at(&column.cells, last);
    for cell in &mut column.cells[last + 1..] {
        if cell.is_unobserved() {
            *cell = Cell::Filled(tail);
        }
    }

    Ok(column)
}
