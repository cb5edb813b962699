//! Duplicate-date resolution: one observation per date, folded by mean.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::average::finite_mean;
use crate::types::{Observation, ResolvedSeries, Series, Value};

/// Collapse observations sharing a date into one, sorted by date.
///
/// Fold rule per date, over the non-missing values in arrival order:
/// - all numeric: arithmetic mean;
/// - any non-numeric: the first value seen wins;
/// - none present: `Missing`.
#[must_use]
pub fn resolve_duplicates(series: Series) -> ResolvedSeries {
    let Series { key, observations } = series;
    #[cfg(feature = "tracing")]
    let total = observations.len();

    let mut by_date: BTreeMap<NaiveDate, Vec<Value>> = BTreeMap::new();
    for o in observations {
        by_date.entry(o.date).or_default().push(o.value);
    }

    #[cfg(feature = "tracing")]
    if by_date.len() < total {
        tracing::debug!(
            series = %key,
            collapsed = total - by_date.len(),
            "collapsed duplicate dates"
        );
    }

    let observations = by_date
        .into_iter()
        .map(|(date, values)| Observation {
            date,
            value: fold_values(values),
        })
        .collect();

    ResolvedSeries(Series { key, observations })
}

/// Number of observations that share a date with an earlier one.
#[must_use]
pub fn count_duplicates(series: &Series) -> usize {
    let mut dates: Vec<NaiveDate> = series.observations.iter().map(|o| o.date).collect();
    let total = dates.len();
    dates.sort_unstable();
    dates.dedup();
    total - dates.len()
}

fn fold_values(values: Vec<Value>) -> Value {
    let mut present = values.into_iter().filter(|v| !v.is_missing());
    let Some(first) = present.next() else {
        return Value::Missing;
    };
    let Some(first_num) = first.as_number() else {
        return first;
    };

    let mut numbers = vec![first_num];
    for v in present {
        match v.as_number() {
            Some(n) => numbers.push(n),
            None => return first,
        }
    }
    finite_mean(&numbers).map_or(Value::Missing, Value::Number)
}
