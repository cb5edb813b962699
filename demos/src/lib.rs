//! Shared fixtures for the runnable demos.
pub mod common;
