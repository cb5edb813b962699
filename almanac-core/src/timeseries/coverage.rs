//! Coverage statistics and cadence estimation over the shared axis.

use chrono::NaiveDate;

use crate::frame::{AlignedColumn, Cell, DateAxis};

/// Fraction of cells that are `Unobserved`, in `[0, 1]`. Empty input yields `1.0`.
#[must_use]
pub fn missing_fraction(cells: &[Cell]) -> f64 {
    if cells.is_empty() {
        return 1.0;
    }
    let missing = cells.iter().filter(|c| c.is_unobserved()).count();
    #[allow(clippy::cast_precision_loss)]
    let frac = missing as f64 / cells.len() as f64;
    frac
}

/// Estimate the representative spacing (in days) of an axis.
///
/// Prefer the mode of adjacent deltas; if there is no unique mode, return the
/// lower median so the result is an actually observed cadence.
///
/// ```
/// use almanac_core::{DateAxis, estimate_step_days};
/// use chrono::NaiveDate;
///
/// let d = |day: u32| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// // Deltas: 1,1,1,3 => unique mode is 1
/// let axis = DateAxis::from_dates([d(1), d(2), d(3), d(4), d(7)]);
/// assert_eq!(estimate_step_days(&axis), Some(1));
///
/// // Deltas: 1,1,7,7 => no unique mode, lower median is 1
/// let axis = DateAxis::from_dates([d(1), d(2), d(3), d(10), d(17)]);
/// assert_eq!(estimate_step_days(&axis), Some(1));
/// ```
///
/// Returns `None` for fewer than two dates.
#[must_use]
pub fn estimate_step_days(axis: &DateAxis) -> Option<i64> {
    let mut deltas: Vec<i64> = axis
        .dates()
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta = deltas[0];
    let mut best_count = 0usize;
    let mut num_best = 0usize;
    let mut cur_delta = deltas[0];
    let mut cur_count = 0usize;
    for &d in &deltas {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        tally(cur_delta, cur_count, &mut best_delta, &mut best_count, &mut num_best);
        cur_delta = d;
        cur_count = 1;
    }
    tally(cur_delta, cur_count, &mut best_delta, &mut best_count, &mut num_best);

    if num_best == 1 {
        return Some(best_delta);
    }
    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

fn tally(
    delta: i64,
    count: usize,
    best_delta: &mut i64,
    best_count: &mut usize,
    num_best: &mut usize,
) {
    if count > *best_count {
        *best_count = count;
        *best_delta = delta;
        *num_best = 1;
    } else if count == *best_count {
        *num_best += 1;
    }
}

/// Longest run of consecutive unobserved cells, as (first, last) dates.
#[must_use]
pub fn longest_gap(axis: &DateAxis, column: &AlignedColumn) -> Option<(NaiveDate, NaiveDate)> {
    let dates = axis.dates();
    let mut best: Option<(usize, usize)> = None;
    let mut start: Option<usize> = None;
    for (i, cell) in column.cells.iter().enumerate().take(dates.len()) {
        if cell.is_unobserved() {
            let s = *start.get_or_insert(i);
            if best.is_none_or(|(bs, be)| i - s > be - bs) {
                best = Some((s, i));
            }
        } else {
            start = None;
        }
    }
    best.map(|(s, e)| (dates[s], dates[e]))
}
