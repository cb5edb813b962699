//! almanac-core
//!
//! Series model and the pure stages of the aggregation pipeline.
//!
//! - `types`: raw values, observations, and named series.
//! - `frame`: the shared date axis and provenance-tagged cells.
//! - `timeseries`: loader, duplicate resolver, aligner, averager, gap filler.
//!
//! Every stage is synchronous and deterministic: the same inputs always yield
//! the same cells, independent of hash ordering or wall-clock time.
#![warn(missing_docs)]

pub mod frame;
pub mod timeseries;
pub mod types;

pub use almanac_types::*;
pub use frame::{AlignedColumn, AlignedFrame, Cell, DateAxis};
pub use timeseries::align::{align, union_axis};
pub use timeseries::average::{average_observed, average_with_attribution, observed_spans};
pub use timeseries::coverage::{estimate_step_days, longest_gap, missing_fraction};
pub use timeseries::dedup::{count_duplicates, resolve_duplicates};
pub use timeseries::fill::fill_gaps;
pub use timeseries::loader::{
    LoadedTable, load_path, load_str, load_table, parse_date, strip_ticker_decorations,
};
pub use types::*;
