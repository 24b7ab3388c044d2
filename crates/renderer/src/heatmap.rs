//! Heatmap rasterization for 2-D scalar fields.

use crate::colormap::{Color, Colormap};
use crate::RenderError;

/// Render a 2-D field as RGBA pixels through a colormap.
///
/// Values are normalized over the finite minimum and maximum of the data;
/// NaN cells (fill values, points outside the domain) render transparent.
///
/// # Arguments
/// - `data`: field values in row-major order, `width * height` elements
/// - `width`: number of columns
/// - `height`: number of rows
/// - `cmap`: gradient to sample
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_heatmap(
    data: &[f64],
    width: usize,
    height: usize,
    cmap: &Colormap,
) -> Result<Vec<u8>, RenderError> {
    if data.len() != width * height {
        return Err(RenderError::ShapeMismatch {
            len: data.len(),
            width,
            height,
        });
    }

    let (min_val, max_val) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    if min_val > max_val {
        return Err(RenderError::NoFiniteValues);
    }

    let range = max_val - min_val;
    // Degenerate (constant) fields map everything to the low end.
    let range = if range.abs() < f64::EPSILON { 1.0 } else { range };

    let mut pixels = vec![0u8; width * height * 4];
    for (idx, &value) in data.iter().enumerate() {
        let color = if value.is_nan() {
            Color::transparent()
        } else {
            let normalized = ((value - min_val) / range).clamp(0.0, 1.0);
            cmap.sample(normalized as f32)
        };

        let pixel_idx = idx * 4;
        pixels[pixel_idx] = color.r;
        pixels[pixel_idx + 1] = color.g;
        pixels[pixel_idx + 2] = color.b;
        pixels[pixel_idx + 3] = color.a;
    }

    Ok(pixels)
}
