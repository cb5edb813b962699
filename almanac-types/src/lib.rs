//! Almanac-specific error, configuration, and report types shared across the workspace.
#![warn(missing_docs)]

mod attribution;
mod config;
mod error;
mod reports;

pub use attribution::{Attribution, Span};
pub use config::{AlmanacConfig, FillPolicy, LoadOptions, PersistConfig};
pub use error::AlmanacError;
pub use reports::{AssemblyReport, DroppedMetric, FailedLoad, LoadReport, RunReport};
