//! Dimension reduction ahead of rendering.

use viz_common::{ReducedSlice, Variable, VizError, VizResult};

/// Dimension the reducer fixes to its first index when present.
const TIME_DIM: &str = "time";

/// Reduce a variable to a renderable slice.
///
/// If the variable has a `"time"` dimension, index 0 is selected along it
/// (the first time step, always, regardless of length) and the remaining
/// dimensions are kept. Variables without a time dimension pass through
/// unchanged. A zero-length time dimension is an out-of-range error.
pub fn reduce(variable: &Variable) -> VizResult<ReducedSlice> {
    let axis = match variable.axis_of(TIME_DIM) {
        Some(axis) => axis,
        None => {
            return Ok(ReducedSlice {
                name: variable.name.clone(),
                dims: variable.dims.clone(),
                shape: variable.shape.clone(),
                data: variable.data.clone(),
            })
        }
    };

    if variable.shape[axis] == 0 {
        return Err(VizError::OutOfRange {
            dim: TIME_DIM.to_string(),
            len: 0,
        });
    }

    let strides = variable.strides();
    let mut dims = variable.dims.clone();
    let mut shape = variable.shape.clone();
    dims.remove(axis);
    shape.remove(axis);

    // Gather the index-0 hyperplane along the time axis. With time as the
    // outermost axis this is a contiguous prefix; inner axes need a strided
    // walk.
    let out_len: usize = shape.iter().product();
    let mut data = Vec::with_capacity(out_len);
    let axis_stride = strides[axis];
    let outer_stride = axis_stride * variable.shape[axis];
    let mut offset = 0;
    while data.len() < out_len {
        data.extend_from_slice(&variable.data[offset..offset + axis_stride]);
        offset += outer_stride;
    }

    Ok(ReducedSlice {
        name: variable.name.clone(),
        dims,
        shape,
        data,
    })
}
