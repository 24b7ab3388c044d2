//! Test data generators for creating synthetic gridded data.
//!
//! These generators create predictable, verifiable value patterns that can
//! be checked cell-by-cell in assertions.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`, in row-major order,
/// so `grid[row * width + col] == col * 1000 + row`.
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a grid where every cell holds the same value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a grid of NaN values, useful for forcing render failures.
pub fn create_nan_grid(width: usize, height: usize) -> Vec<f64> {
    vec![f64::NAN; width * height]
}

/// Creates a temperature-like gradient in Kelvin, cold at the top-left and
/// warm at the bottom-right (roughly 250K to 310K).
pub fn create_temperature_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let t = (row + col) as f64 / (width + height).max(1) as f64;
            data.push(250.0 + 60.0 * t);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pattern() {
        let grid = create_test_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1], 1000.0);
        assert_eq!(grid[10], 1.0);
    }

    #[test]
    fn test_temperature_range() {
        let grid = create_temperature_grid(8, 8);
        assert!(grid.iter().all(|&v| (250.0..=310.0).contains(&v)));
    }
}
