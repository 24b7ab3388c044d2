//! Row-oriented tables for gridded variables.
//!
//! Provides [`RowTable`] (column names plus rows of optional values),
//! flattening of a variable into one row per coordinate tuple, CSV
//! serialization, and the full outer join used to build the combined table.

mod flatten;
mod table;

pub use flatten::flatten_variable;
pub use table::RowTable;

use thiserror::Error;
use viz_common::VizError;

/// Result type for table operations.
pub type TabularResult<T> = Result<T, TabularError>;

/// Errors produced while building or combining tables.
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("Tables share no columns to join on")]
    NoCommonColumns,

    #[error("Row length {got} does not match column count {expected}")]
    RowLengthMismatch { got: usize, expected: usize },

    #[error("Variable '{name}' data length {got} does not match its shape ({expected})")]
    ShapeMismatch {
        name: String,
        got: usize,
        expected: usize,
    },
}

impl From<TabularError> for VizError {
    fn from(err: TabularError) -> Self {
        VizError::Export(err.to_string())
    }
}
