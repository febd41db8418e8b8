use std::sync::Arc;

use crate::{
    capture::board::{PreviewBoard, RegionHandle},
    capture::renderer::Renderer,
    foundation::core::Canvas,
    foundation::error::{PlaqueError, PlaqueResult},
};

/// MIME type of every captured raster.
pub const RASTER_MIME: &str = "image/png";

/// Target size and encoder quality of a capture.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    pub width: u32,
    pub height: u32,
    /// Lossy encoder hint in `0.0..=1.0`. PNG output is lossless and ignores it.
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            quality: 0.8,
        }
    }
}

impl CaptureOptions {
    pub fn validate(&self) -> PlaqueResult<Canvas> {
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(PlaqueError::validation("capture quality must be in 0.0..=1.0"));
        }
        Canvas::new(self.width, self.height)
    }
}

/// Encoded PNG bytes of one captured composition.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBytes {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for RasterBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBytes")
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RasterBytes {
    pub fn mime(&self) -> &'static str {
        RASTER_MIME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Wrap the raster as a named file ready for a multipart upload.
    pub fn into_upload_file(self, file_name: impl Into<String>) -> UploadFile {
        UploadFile {
            file_name: file_name.into(),
            mime: RASTER_MIME,
            bytes: self.bytes,
        }
    }
}

/// A named binary payload for the `image` multipart field.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Rasterizes mounted preview regions through an injected [`Renderer`].
#[derive(Clone)]
pub struct CaptureService {
    renderer: Arc<dyn Renderer>,
    options: CaptureOptions,
}

impl std::fmt::Debug for CaptureService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CaptureService {
    pub fn new(renderer: Arc<dyn Renderer>, options: CaptureOptions) -> PlaqueResult<Self> {
        options.validate()?;
        Ok(Self { renderer, options })
    }

    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    /// Render the region behind `handle` to PNG bytes at the configured target size.
    ///
    /// Rendering runs on the blocking pool; every failure is reported as
    /// [`PlaqueError::Capture`].
    #[tracing::instrument(skip(self, board), fields(variant = ?handle.variant))]
    pub async fn capture(
        &self,
        board: &PreviewBoard,
        handle: RegionHandle,
    ) -> PlaqueResult<RasterBytes> {
        let target = self.options.validate()?;
        let scene = board.scene(handle)?;
        let renderer = Arc::clone(&self.renderer);

        let bytes = tokio::task::spawn_blocking(move || renderer.render(&scene, target))
            .await
            .map_err(|e| PlaqueError::capture(format!("render task failed: {e}")))?
            .map_err(into_capture_error)?;

        if bytes.is_empty() {
            return Err(PlaqueError::capture("renderer produced no bytes"));
        }
        tracing::debug!(len = bytes.len(), "composition captured");
        Ok(RasterBytes {
            bytes,
            width: target.width,
            height: target.height,
        })
    }
}

fn into_capture_error(err: PlaqueError) -> PlaqueError {
    match err {
        PlaqueError::Capture(_) => err,
        other => PlaqueError::capture(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/service.rs"]
mod tests;
