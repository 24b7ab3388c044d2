//! In-memory model of a gridded dataset.
//!
//! A [`Dataset`] is an ordered collection of named [`Variable`]s over a set
//! of shared named [`Dimension`]s. Variables hold dense row-major (dimension
//! major) `f64` values. The model is read-only once built; the pipeline
//! never mutates it.

use serde::{Deserialize, Serialize};

/// A named axis with a fixed length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// One named field, indexed over an ordered subset of the dataset's
/// dimensions. Values are stored densely in dimension-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Dimension names, outermost first.
    pub dims: Vec<String>,
    /// Length along each dimension, parallel to `dims`.
    pub shape: Vec<usize>,
    /// Dense values, `shape.iter().product()` elements.
    pub data: Vec<f64>,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        dims: Vec<String>,
        shape: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            dims,
            shape,
            data,
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of a dimension in this variable's axis list.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Element strides for dimension-major layout, parallel to `dims`.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.shape.len()];
        for i in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.shape[i + 1];
        }
        strides
    }
}

/// A 2-D (or lower) projection of a variable, produced by the dimension
/// reducer and consumed by a single render call.
#[derive(Debug, Clone)]
pub struct ReducedSlice {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl ReducedSlice {
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }
}

/// The complete gridded input: shared dimensions plus an ordered collection
/// of uniquely named variables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dims: Vec<Dimension>,
    variables: Vec<Variable>,
}

impl Dataset {
    pub fn new(dims: Vec<Dimension>, variables: Vec<Variable>) -> Self {
        Self { dims, variables }
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dims.iter().find(|d| d.name == name)
    }

    /// All variables in declaration order, coordinate variables included.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// The coordinate variable for a dimension: a 1-D variable whose name
    /// equals the dimension's name.
    pub fn coord(&self, dim: &str) -> Option<&Variable> {
        self.variable(dim)
            .filter(|v| v.ndim() == 1 && v.dims[0] == dim)
    }

    /// Data variables in declaration order, excluding coordinate variables.
    pub fn data_vars(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(|v| !(v.ndim() == 1 && v.dims[0] == v.name))
    }
}
