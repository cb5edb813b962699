//! Almanac turns flat per-source time-series tables into one calendar-indexed
//! wide table.
//!
//! Overview
//! - Loads per-source CSV tables (date column plus value columns).
//! - Collapses duplicate dates, aligns every series on the union of their dates,
//!   and tags each cell as observed, filled, or unobserved.
//! - Averages the same metric across the sources of a group using observed
//!   cells only, then fills residual gaps by date interpolation with edge fills.
//! - Publishes a timestamped snapshot and atomically replaces `<name>_latest.csv`.
//!
//! Key behaviors and trade-offs
//! - Metric-level failures (no observations, too many gaps, name collisions)
//!   omit that column and are listed in the report; the rest of the table is
//!   still published. A table that cannot be read is skipped the same way.
//! - Content is deterministic: the same inputs produce byte-identical tables,
//!   whether assembled sequentially or with [`Almanac::run_parallel`].
//! - Replacing `latest` is retried with jittered delays; if every attempt
//!   fails, the previous `latest` is kept and the snapshot is reported as the
//!   fallback artifact.
//!
//! Examples
//! ```rust,no_run
//! use almanac::{Almanac, FillPolicy, TableInput};
//!
//! let almanac = Almanac::builder()
//!     .average_group(
//!         "AVG",
//!         vec![
//!             TableInput::path("binance", "datasets/exchanges/binance.csv"),
//!             TableInput::path("bitstamp", "datasets/exchanges/bitstamp.csv"),
//!         ],
//!     )
//!     .feature_table(
//!         "Blockchain",
//!         TableInput::path("blockchain", "datasets/blockchain.csv")
//!             .exclude("Miner Revenue (USD)"),
//!     )
//!     .bare_column("Gold/BTC Ratio")
//!     .fill_policy(FillPolicy { max_missing_fraction: 0.9 })
//!     .build()?;
//!
//! let report = almanac.run()?;
//! for d in &report.assembly.dropped {
//!     eprintln!("omitted {}: {}", d.column, d.reason);
//! }
//! # Ok::<(), almanac::AlmanacError>(())
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
pub mod pipeline;

pub use core::{Almanac, AlmanacBuilder};
pub use pipeline::input::{SourceGroup, TableInput};
pub use pipeline::persist::{Published, backup_path, latest_path};
pub use pipeline::table::WideTable;

pub use almanac_types::{
    AlmanacConfig, AlmanacError, AssemblyReport, Attribution, DroppedMetric, FailedLoad,
    FillPolicy, LoadOptions, LoadReport, PersistConfig, RunReport, Span,
};
