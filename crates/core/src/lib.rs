//! Core types and shared functionality for cache-sweeper.
//!
//! This crate provides:
//! - The cache entry model returned by the remote cache API
//! - Layered input loading and validation
//! - Unified error types
//! - The sweep workflow (enumerate, then optionally delete one entry)

pub mod config;
pub mod entry;
pub mod error;
pub mod report;
pub mod sweep;

pub use config::{ActionInputs, ConfigError, Repository, SweepConfig};
pub use entry::CacheEntry;
pub use error::Error;
pub use report::{Reporter, WorkflowReporter};
pub use sweep::{CacheApi, DeleteOutcome, SweepSummary};
