use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Pixel size of a raster target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> PlaqueResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlaqueError::validation("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn square(side: u32) -> PlaqueResult<Self> {
        Self::new(side, side)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#rrggbb` form used for SVG `fill`; alpha goes in `fill-opacity`.
    pub fn svg_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn svg_opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

/// Logical viewport width in CSS-like pixels.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct ViewportWidth(pub f64);

impl ViewportWidth {
    pub fn new(px: f64) -> PlaqueResult<Self> {
        if !px.is_finite() || px < 0.0 {
            return Err(PlaqueError::validation(
                "viewport width must be finite and >= 0",
            ));
        }
        Ok(Self(px))
    }

    pub fn px(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
