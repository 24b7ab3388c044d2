//! Shared test utilities for the gridviz workspace.
//!
//! Provides:
//! - A builder that serializes synthetic datasets into NetCDF classic
//!   bytes, for exercising the parser and the end-to-end pipeline.
//! - Grid value generators with predictable patterns.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod cdf;
pub mod generators;

pub use cdf::{CdfBuilder, CdfType};
pub use generators::*;
