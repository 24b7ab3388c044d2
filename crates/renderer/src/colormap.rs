//! Named colormap gradients.
//!
//! Each colormap is an ordered table of color stops sampled by a normalized
//! value in `[0, 1]` with linear interpolation between stops. The built-in
//! set covers the gradients the default colormap policy refers to.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)) as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)) as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)) as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)) as u8,
    )
}

/// A named gradient defined by evenly spaced RGB stops.
#[derive(Debug, Clone, Copy)]
pub struct Colormap {
    pub name: &'static str,
    stops: &'static [(u8, u8, u8)],
}

impl Colormap {
    /// Sample the gradient at a normalized position in `[0, 1]`.
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        let scaled = t * last as f32;
        let low = (scaled.floor() as usize).min(last);
        let high = (low + 1).min(last);
        let frac = scaled - low as f32;

        let (r1, g1, b1) = self.stops[low];
        let (r2, g2, b2) = self.stops[high];
        interpolate_color(
            Color::new(r1, g1, b1, 255),
            Color::new(r2, g2, b2, 255),
            frac,
        )
    }
}

pub const VIRIDIS: Colormap = Colormap {
    name: "viridis",
    stops: &[
        (68, 1, 84),
        (72, 40, 120),
        (62, 74, 137),
        (49, 104, 142),
        (38, 130, 142),
        (31, 158, 137),
        (53, 183, 121),
        (109, 205, 89),
        (180, 222, 44),
        (253, 231, 37),
    ],
};

pub const PLASMA: Colormap = Colormap {
    name: "plasma",
    stops: &[
        (13, 8, 135),
        (106, 0, 168),
        (177, 42, 144),
        (225, 100, 98),
        (252, 166, 54),
        (240, 249, 33),
    ],
};

pub const BLUES: Colormap = Colormap {
    name: "Blues",
    stops: &[
        (247, 251, 255),
        (222, 235, 247),
        (198, 219, 239),
        (158, 202, 225),
        (107, 174, 214),
        (66, 146, 198),
        (33, 113, 181),
        (8, 81, 156),
        (8, 48, 107),
    ],
};

pub const YLGNBU: Colormap = Colormap {
    name: "YlGnBu",
    stops: &[
        (255, 255, 217),
        (237, 248, 177),
        (199, 233, 180),
        (127, 205, 187),
        (65, 182, 196),
        (29, 145, 192),
        (34, 94, 168),
        (37, 52, 148),
        (8, 29, 88),
    ],
};

pub const RDBU: Colormap = Colormap {
    name: "RdBu",
    stops: &[
        (103, 0, 31),
        (178, 24, 43),
        (214, 96, 77),
        (244, 165, 130),
        (253, 219, 199),
        (247, 247, 247),
        (209, 229, 240),
        (146, 197, 222),
        (67, 147, 195),
        (33, 102, 172),
        (5, 48, 97),
    ],
};

pub const PIYG: Colormap = Colormap {
    name: "PiYG",
    stops: &[
        (142, 1, 82),
        (197, 27, 125),
        (222, 119, 174),
        (241, 182, 218),
        (253, 224, 239),
        (247, 247, 247),
        (230, 245, 208),
        (184, 225, 134),
        (127, 188, 65),
        (77, 146, 33),
        (39, 100, 25),
    ],
};

/// Look up a built-in colormap by its exact id.
pub fn by_name(name: &str) -> Option<&'static Colormap> {
    match name {
        "viridis" => Some(&VIRIDIS),
        "plasma" => Some(&PLASMA),
        "Blues" => Some(&BLUES),
        "YlGnBu" => Some(&YLGNBU),
        "RdBu" => Some(&RDBU),
        "PiYG" => Some(&PIYG),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let start = VIRIDIS.sample(0.0);
        assert_eq!((start.r, start.g, start.b), (68, 1, 84));
        let end = VIRIDIS.sample(1.0);
        assert_eq!((end.r, end.g, end.b), (253, 231, 37));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        assert_eq!(PLASMA.sample(-0.5), PLASMA.sample(0.0));
        assert_eq!(PLASMA.sample(1.5), PLASMA.sample(1.0));
    }

    #[test]
    fn test_sample_interpolates_between_stops() {
        // Midway between the first two Blues stops.
        let c = BLUES.sample(0.5 / 8.0);
        assert!(c.r > 222 && c.r < 247);
    }

    #[test]
    fn test_by_name_exact_match() {
        assert_eq!(by_name("Blues").unwrap().name, "Blues");
        assert!(by_name("blues").is_none());
        assert!(by_name("no_such_map").is_none());
    }
}
