//! Flattening a variable into one row per coordinate tuple.

use viz_common::{Dataset, Variable};

use crate::{RowTable, TabularError, TabularResult};

/// Flatten a full (unreduced) variable into a [`RowTable`].
///
/// Columns are the variable's coordinate dimensions in axis order followed
/// by the variable's own name; one row is emitted per coordinate tuple in
/// dimension-major order. Dimensions with a coordinate variable use its
/// values; bare dimensions use 0-based indices.
pub fn flatten_variable(dataset: &Dataset, variable: &Variable) -> TabularResult<RowTable> {
    let expected = variable.len();
    if variable.data.len() != expected {
        return Err(TabularError::ShapeMismatch {
            name: variable.name.clone(),
            got: variable.data.len(),
            expected,
        });
    }

    // Coordinate values per axis; None falls back to the index itself.
    let coords: Vec<Option<&[f64]>> = variable
        .dims
        .iter()
        .zip(&variable.shape)
        .map(|(dim, &len)| {
            dataset
                .coord(dim)
                .filter(|c| c.data.len() == len)
                .map(|c| c.data.as_slice())
        })
        .collect();

    let mut columns = variable.dims.clone();
    columns.push(variable.name.clone());
    let mut table = RowTable::new(columns);

    let strides = variable.strides();
    for (flat, &value) in variable.data.iter().enumerate() {
        let mut row = Vec::with_capacity(variable.ndim() + 1);
        for (axis, stride) in strides.iter().enumerate() {
            let idx = (flat / stride) % variable.shape[axis];
            let coord = match coords[axis] {
                Some(values) => values[idx],
                None => idx as f64,
            };
            row.push(Some(coord));
        }
        row.push(Some(value));
        table.push_row(row)?;
    }

    Ok(table)
}
