use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Viewports narrower than this use the compact breakpoint.
pub const COMPACT_BREAKPOINT_PX: f64 = 600.0;
/// Viewports wider than this show both variants side by side.
pub const SIDE_BY_SIDE_MIN_PX: f64 = 1000.0;

const COMPACT_CONTAINER_PX: f64 = 300.0;
const WIDE_CONTAINER_PX: f64 = 500.0;
const COMPACT_MIN_TEXT_PX: f64 = 50.0;
const WIDE_MIN_TEXT_PX: f64 = 80.0;

/// One of the (up to two) compositions offered for a photo.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Photo keeps its aspect ratio above a text band.
    #[default]
    Primary,
    /// Photo fills the square above a minimum-height text band. Wide photos only.
    Secondary,
}

/// Photo natural width divided by natural height.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(ratio: f64) -> PlaqueResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(PlaqueError::validation(
                "aspect ratio must be finite and > 0",
            ));
        }
        Ok(Self(ratio))
    }

    /// `None` while either natural dimension is still unknown (zero).
    pub fn from_natural(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self(f64::from(width) / f64::from(height)))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_wide(self) -> bool {
        self.0 > 1.0
    }
}

/// Square layout budget chosen by viewport width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Breakpoint {
    pub container_size: f64,
    pub min_text_height: f64,
}

impl Breakpoint {
    pub fn for_viewport(viewport_width: f64) -> Self {
        if viewport_width < COMPACT_BREAKPOINT_PX {
            Self {
                container_size: COMPACT_CONTAINER_PX,
                min_text_height: COMPACT_MIN_TEXT_PX,
            }
        } else {
            Self {
                container_size: WIDE_CONTAINER_PX,
                min_text_height: WIDE_MIN_TEXT_PX,
            }
        }
    }
}

/// Logical size of one composition: photo area stacked over a text band.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub image_width: f64,
    pub image_height: f64,
    pub text_height: f64,
}

impl Dimensions {
    /// Total height, equal to the container size of the breakpoint that produced it.
    pub fn total_height(&self) -> f64 {
        self.image_height + self.text_height
    }
}

/// Output of [`compute_dimensions`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Layout {
    pub breakpoint: Breakpoint,
    pub primary: Dimensions,
    pub secondary: Option<Dimensions>,
}

impl Layout {
    pub fn for_variant(&self, variant: LayoutVariant) -> Option<&Dimensions> {
        match variant {
            LayoutVariant::Primary => Some(&self.primary),
            LayoutVariant::Secondary => self.secondary.as_ref(),
        }
    }
}

/// Compute preview dimensions for a photo of `aspect` shown in a viewport `viewport_width` wide.
///
/// Pure and deterministic: identical inputs always produce identical outputs.
pub fn compute_dimensions(aspect: AspectRatio, viewport_width: f64) -> Layout {
    let bp = Breakpoint::for_viewport(viewport_width);
    let container = bp.container_size;

    let mut primary_image_height = container / aspect.get();
    if container - primary_image_height < bp.min_text_height {
        primary_image_height = container - bp.min_text_height;
    }
    let primary = Dimensions {
        image_width: container,
        image_height: primary_image_height,
        text_height: container - primary_image_height,
    };

    let secondary = aspect.is_wide().then(|| {
        let mut image_height = container;
        let text_height = image_height.min(bp.min_text_height);
        image_height -= text_height;
        Dimensions {
            image_width: container,
            image_height,
            text_height,
        }
    });

    Layout {
        breakpoint: bp,
        primary,
        secondary,
    }
}

/// What the preview shows for a given photo/viewport/selection combination.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PreviewPlan {
    /// Variants mounted on screen, in display order.
    pub rendered: Vec<LayoutVariant>,
    /// Whether the "choose a layout" heading is shown.
    pub show_choice_title: bool,
    /// Whether per-variant select buttons are shown.
    pub offer_selection: bool,
    /// Whether the submit action is available.
    pub can_submit: bool,
}

impl PreviewPlan {
    pub fn new(
        aspect: AspectRatio,
        viewport_width: f64,
        selected: Option<LayoutVariant>,
    ) -> Self {
        let side_by_side = aspect.is_wide() && viewport_width > SIDE_BY_SIDE_MIN_PX;
        let rendered = if side_by_side {
            vec![LayoutVariant::Primary, LayoutVariant::Secondary]
        } else {
            vec![LayoutVariant::Primary]
        };
        Self {
            rendered,
            show_choice_title: aspect.is_wide(),
            offer_selection: side_by_side && selected.is_none(),
            can_submit: !side_by_side || selected.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
