//! `mkbench`: summarize write-throughput benchmark logs.
//!
//! Raw per-second samples from many worker runs are reduced to one
//! representative throughput per run, averaged per workload and day, and
//! merged with the summaries of earlier invocations into a date-sorted time
//! series. See [`loader::parse_write`] for the end-to-end pipeline.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod cook;
pub mod error;
pub mod format;
pub mod ingest;
pub mod loader;
pub mod logging;
pub mod model;
pub mod reduce;
pub mod util;

pub use error::{MkbenchError, Result, StructuredError};
