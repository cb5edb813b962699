//! Aggregation stages, leaves first.
//!
//! - `loader`: read a raw per-source table into series
//! - `dedup`: collapse same-date observations
//! - `align`: reindex series onto the shared date axis
//! - `average`: merge one metric across sources from observed cells only
//! - `fill`: interpolate and edge-fill the remaining holes
//! - `coverage`: missing-fraction, cadence, and gap diagnostics
pub mod align;
pub mod average;
pub mod coverage;
pub mod dedup;
pub mod fill;
pub mod loader;
