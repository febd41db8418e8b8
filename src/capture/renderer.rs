use crate::{
    capture::board::CaptureScene,
    foundation::core::{Canvas, Rgba8},
    foundation::error::PlaqueResult,
};

/// Turns a described composition into encoded raster bytes.
///
/// Implementations must be deterministic for a given scene and target, and must not do IO
/// beyond what was front-loaded at construction (fonts).
pub trait Renderer: Send + Sync {
    /// Rasterize `scene` scaled to `target` and return the encoded image.
    fn render(&self, scene: &CaptureScene, target: Canvas) -> PlaqueResult<Vec<u8>>;
}

/// Colors and typography of the text band.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub band_rgba: Rgba8,
    pub text_rgba: Rgba8,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            band_rgba: Rgba8::opaque(255, 255, 255),
            text_rgba: Rgba8::opaque(24, 24, 24),
            font_family: "sans-serif".to_string(),
        }
    }
}
