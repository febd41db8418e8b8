use tokio::sync::watch;

use crate::{
    foundation::error::PlaqueResult,
    layout::engine::{AspectRatio, Layout, LayoutVariant, PreviewPlan, compute_dimensions},
};

/// Source of viewport-width signals (the window `resize` event).
#[derive(Debug)]
pub struct Viewport {
    tx: watch::Sender<f64>,
}

impl Viewport {
    pub fn new(width: f64) -> PlaqueResult<Self> {
        let width = crate::foundation::core::ViewportWidth::new(width)?.px();
        let (tx, _rx) = watch::channel(width);
        Ok(Self { tx })
    }

    pub fn width(&self) -> f64 {
        *self.tx.borrow()
    }

    /// Publish a new width. Never fails, even with no listener attached.
    pub fn resize(&self, width: f64) -> PlaqueResult<()> {
        let width = crate::foundation::core::ViewportWidth::new(width)?.px();
        self.tx.send_if_modified(|cur| {
            if *cur == width {
                return false;
            }
            *cur = width;
            true
        });
        Ok(())
    }

    /// Register a resize listener. It deregisters itself on drop.
    pub fn listen(&self) -> ResizeListener {
        ResizeListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Scoped resize subscription.
#[derive(Debug)]
pub struct ResizeListener {
    rx: watch::Receiver<f64>,
}

impl ResizeListener {
    pub fn width(&self) -> f64 {
        *self.rx.borrow()
    }

    /// Wait for the next width change. `None` once the viewport is gone.
    pub async fn changed(&mut self) -> Option<f64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

/// Layout as seen by a preview: loading until the photo reports its natural size.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutState {
    Loading,
    Ready(Layout),
}

impl LayoutState {
    pub fn layout(&self) -> Option<&Layout> {
        match self {
            Self::Loading => None,
            Self::Ready(l) => Some(l),
        }
    }
}

/// Combines the image-load signal and the resize signal into the current layout.
#[derive(Debug)]
pub struct LayoutTracker {
    aspect: Option<AspectRatio>,
    listener: ResizeListener,
}

impl LayoutTracker {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            aspect: None,
            listener: viewport.listen(),
        }
    }

    /// Image-load signal. Zero natural dimensions mean "not decoded yet" and are ignored.
    pub fn on_image_load(&mut self, natural_width: u32, natural_height: u32) -> LayoutState {
        if let Some(aspect) = AspectRatio::from_natural(natural_width, natural_height) {
            tracing::debug!(aspect = aspect.get(), "photo aspect ratio known");
            self.aspect = Some(aspect);
        }
        self.state()
    }

    pub fn aspect(&self) -> Option<AspectRatio> {
        self.aspect
    }

    pub fn viewport_width(&self) -> f64 {
        self.listener.width()
    }

    pub fn state(&self) -> LayoutState {
        match self.aspect {
            None => LayoutState::Loading,
            Some(aspect) => LayoutState::Ready(compute_dimensions(aspect, self.viewport_width())),
        }
    }

    pub fn plan(&self, selected: Option<LayoutVariant>) -> Option<PreviewPlan> {
        self.aspect
            .map(|aspect| PreviewPlan::new(aspect, self.viewport_width(), selected))
    }

    /// Wait for the next resize and return the recomputed state.
    pub async fn next_change(&mut self) -> Option<LayoutState> {
        self.listener.changed().await?;
        Some(self.state())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tracker.rs"]
mod tests;
