//! Raster rendering for gridded data visualization.
//!
//! Maps a 2-D scalar field through a named colormap and encodes the result
//! as a PNG (indexed when the raster has few unique colors, RGBA otherwise).

pub mod colormap;
pub mod heatmap;
pub mod png;

pub use colormap::{by_name, Color, Colormap};
pub use heatmap::render_heatmap;

use thiserror::Error;

/// Errors produced while rasterizing a slice.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Slice is not renderable: expected 2 dimensions, got {0}")]
    NotTwoDimensional(usize),

    #[error("Data length {len} does not match raster {width}x{height}")]
    ShapeMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("No finite values to render")]
    NoFiniteValues,

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Render a 2-D field through `cmap` and encode as a titled PNG.
pub fn render_field_png(
    data: &[f64],
    width: usize,
    height: usize,
    cmap: &Colormap,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let pixels = render_heatmap(data, width, height, cmap)?;
    png::create_png_auto(&pixels, width, height, Some(title)).map_err(RenderError::Encode)
}
