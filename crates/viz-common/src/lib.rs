//! Shared types for the gridviz workspace.
//!
//! Holds the gridded dataset model (dimensions, variables, reduced slices)
//! and the common error taxonomy used across the parser, renderer, tabular,
//! and pipeline crates.

pub mod artifact;
pub mod dataset;
pub mod error;

pub use artifact::{ArtifactHandle, ArtifactKind};
pub use dataset::{Dataset, Dimension, ReducedSlice, Variable};
pub use error::{VizError, VizResult};
