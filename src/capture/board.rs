use crate::{
    assets::{image::ImageAsset, message::Message},
    foundation::core::Rgba8,
    foundation::error::{PlaqueError, PlaqueResult},
    layout::engine::{Dimensions, Layout, LayoutVariant, PreviewPlan},
};

/// One mounted composition on the preview board.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub variant: LayoutVariant,
    pub dims: Dimensions,
    pub container_size: f64,
    /// Opaque fill behind the composition; `None` keeps it transparent.
    pub background: Option<Rgba8>,
}

/// Reference to a mounted region. Goes stale once the board is remounted or cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionHandle {
    pub variant: LayoutVariant,
    generation: u64,
}

/// Everything a [`crate::Renderer`] needs to rasterize one composition.
#[derive(Clone, Debug)]
pub struct CaptureScene {
    pub variant: LayoutVariant,
    pub dims: Dimensions,
    pub container_size: f64,
    pub photo: ImageAsset,
    pub message: String,
    pub background: Option<Rgba8>,
}

/// The set of compositions currently shown in the preview.
#[derive(Debug, Default)]
pub struct PreviewBoard {
    generation: u64,
    regions: Vec<Region>,
    photo: Option<ImageAsset>,
    message: Message,
    background: Option<Rgba8>,
}

impl PreviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions mounted after this call get an opaque background.
    pub fn with_background(mut self, background: Option<Rgba8>) -> Self {
        self.background = background.filter(|c| c.is_opaque());
        self
    }

    /// Replace the mounted regions with the variants `plan` renders.
    pub fn mount(
        &mut self,
        layout: &Layout,
        plan: &PreviewPlan,
        photo: ImageAsset,
        message: Message,
    ) -> Vec<RegionHandle> {
        self.generation += 1;
        let background = self.background;
        self.regions = plan
            .rendered
            .iter()
            .filter_map(|&variant| {
                layout.for_variant(variant).map(|dims| Region {
                    variant,
                    dims: *dims,
                    container_size: layout.breakpoint.container_size,
                    background,
                })
            })
            .collect();
        self.photo = Some(photo);
        self.message = message;
        tracing::debug!(
            generation = self.generation,
            regions = self.regions.len(),
            "preview mounted"
        );
        self.handles()
    }

    /// Detach every region; outstanding handles become stale.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.regions.clear();
        self.photo = None;
        self.message = Message::default();
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn handles(&self) -> Vec<RegionHandle> {
        self.regions
            .iter()
            .map(|r| RegionHandle {
                variant: r.variant,
                generation: self.generation,
            })
            .collect()
    }

    /// Pick the region to capture: the explicit selection, else the first mounted region.
    pub fn select(&self, selected: Option<LayoutVariant>) -> PlaqueResult<RegionHandle> {
        let region = match selected {
            Some(variant) => self
                .regions
                .iter()
                .find(|r| r.variant == variant)
                .ok_or_else(|| {
                    PlaqueError::capture(format!("no {variant:?} composition is mounted"))
                })?,
            None => self
                .regions
                .first()
                .ok_or_else(|| PlaqueError::capture("no composition is mounted"))?,
        };
        Ok(RegionHandle {
            variant: region.variant,
            generation: self.generation,
        })
    }

    /// Describe the composition behind `handle`.
    pub fn scene(&self, handle: RegionHandle) -> PlaqueResult<CaptureScene> {
        if handle.generation != self.generation {
            return Err(PlaqueError::capture("composition region is detached"));
        }
        let region = self
            .regions
            .iter()
            .find(|r| r.variant == handle.variant)
            .ok_or_else(|| PlaqueError::capture("composition region is missing"))?;
        let photo = self
            .photo
            .clone()
            .ok_or_else(|| PlaqueError::capture("no photo attached to the preview"))?;
        Ok(CaptureScene {
            variant: region.variant,
            dims: region.dims,
            container_size: region.container_size,
            photo,
            message: self.message.as_str().to_string(),
            background: region.background,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/board.rs"]
mod tests;
