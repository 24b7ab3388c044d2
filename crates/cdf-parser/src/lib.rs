//! NetCDF classic format parser.
//!
//! Reads CDF-1 and CDF-2 ("64-bit offset") files directly from bytes and
//! produces a [`viz_common::Dataset`]. The classic format is a simple
//! big-endian header (dimension list, attribute list, variable list)
//! followed by fixed-size and record variable payloads, so no libnetcdf or
//! HDF5 bindings are needed.
//!
//! # Behavior notes
//!
//! - All numeric external types (byte, short, int, float, double) are
//!   widened to `f64`.
//! - Character variables are not numeric and are skipped.
//! - A variable's `_FillValue` attribute maps matching raw values to NaN.
//! - The record dimension's length is resolved from the file's `numrecs`.

mod error;
mod reader;

pub use error::{CdfError, CdfResult};
pub use reader::parse_dataset;

use bytes::Bytes;
use viz_common::{Dataset, VizError, VizResult};

/// Open a dataset from raw NetCDF classic bytes, mapping parse failures to
/// the run-level fatal error.
pub fn open_dataset(data: &Bytes) -> VizResult<Dataset> {
    parse_dataset(data).map_err(VizError::from)
}

impl From<CdfError> for VizError {
    fn from(err: CdfError) -> Self {
        VizError::DatasetOpen(err.to_string())
    }
}
