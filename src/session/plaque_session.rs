use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    assets::{
        image::{ImageAsset, Selection, SelectionRejected, select_files},
        message::{LengthAlert, Message},
    },
    capture::{
        board::PreviewBoard,
        cpu::CpuRenderer,
        renderer::{Renderer, Theme},
        service::{CaptureOptions, CaptureService},
    },
    foundation::{
        config::PipelineConfig,
        core::Rgba8,
        error::{PlaqueError, PlaqueResult},
    },
    i18n::catalog::{Catalog, Locale, catalog},
    layout::{
        engine::{LayoutVariant, PreviewPlan},
        tracker::{LayoutState, LayoutTracker, Viewport},
    },
    session::notify::{Notification, Notifier, TracingNotifier},
    state::store::{Action, AppState, StateSubscription, Store},
    upload::{
        download::{DirectorySink, DownloadSink},
        pipeline::{UploadPipeline, UploadState},
        transport::{ReqwestTransport, Transport},
    },
};

/// Session construction options.
#[derive(Clone, Debug)]
pub struct PlaqueSessionOpts {
    /// Initial viewport width in CSS pixels.
    pub viewport_width: f64,
    pub capture: CaptureOptions,
    /// Opaque fill behind captured compositions.
    pub background: Option<Rgba8>,
}

impl Default for PlaqueSessionOpts {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            capture: CaptureOptions::default(),
            background: None,
        }
    }
}

/// Injectable capabilities of a session.
#[derive(Clone)]
pub struct SessionDeps {
    pub renderer: Arc<dyn Renderer>,
    pub transport: Arc<dyn Transport>,
    pub sink: Arc<dyn DownloadSink>,
    pub notifier: Arc<dyn Notifier>,
}

impl SessionDeps {
    /// CPU renderer, `reqwest` transport, directory sink and tracing notifications.
    pub fn from_config(config: &PipelineConfig, theme: Theme) -> PlaqueResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer: Arc::new(CpuRenderer::new(theme, config.fonts_dir.as_deref())),
            transport: Arc::new(ReqwestTransport::new(Duration::from_millis(
                config.request_timeout_ms,
            ))?),
            sink: Arc::new(DirectorySink::new(config.download_dir.clone())),
            notifier: Arc::new(TracingNotifier),
        })
    }
}

/// One user's pass through the form: pick a photo, type a message, preview, submit.
///
/// All UI state goes through the [`Store`]; the session owns the photo, the message, the layout
/// tracker and the mounted preview.
pub struct PlaqueSession {
    store: Arc<Store>,
    viewport: Viewport,
    tracker: LayoutTracker,
    board: PreviewBoard,
    pipeline: UploadPipeline,
    notifier: Arc<dyn Notifier>,
    photo: Option<ImageAsset>,
    message: Message,
    readiness: StateSubscription,
}

impl std::fmt::Debug for PlaqueSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaqueSession")
            .field("state", &self.store.state())
            .field("photo", &self.photo)
            .field("message", &self.message)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl PlaqueSession {
    pub fn new(config: &PipelineConfig, opts: PlaqueSessionOpts, deps: SessionDeps) -> PlaqueResult<Self> {
        config.validate()?;
        let store = Arc::new(Store::new(AppState {
            locale: Locale::from_code(&config.locale).code().to_string(),
            ..AppState::default()
        }));
        let viewport = Viewport::new(opts.viewport_width)?;
        let tracker = LayoutTracker::new(&viewport);
        let capture = CaptureService::new(deps.renderer, opts.capture)?;
        let pipeline = UploadPipeline::new(
            capture,
            deps.transport,
            deps.sink,
            Arc::clone(&store),
            Arc::clone(&deps.notifier),
            config.endpoint(),
        );
        let readiness = store.subscribe();
        Ok(Self {
            store,
            viewport,
            tracker,
            board: PreviewBoard::new().with_background(opts.background),
            pipeline,
            notifier: deps.notifier,
            photo: None,
            message: Message::default(),
            readiness,
        })
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.store.state()
    }

    pub fn upload_state(&self) -> UploadState {
        self.pipeline.state()
    }

    pub fn photo(&self) -> Option<&ImageAsset> {
        self.photo.as_ref()
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn board(&self) -> &PreviewBoard {
        &self.board
    }

    pub fn text(&self) -> &'static Catalog {
        catalog(&self.store.state().locale)
    }

    pub fn set_locale(&self, code: &str) {
        self.store
            .dispatch(Action::SetLocale(Locale::from_code(code).code().to_string()));
    }

    /// File-picker change. Zero paths drop the pending photo; rejections keep it and warn.
    #[tracing::instrument(skip(self))]
    pub fn select_files(&mut self, paths: &[PathBuf]) -> PlaqueResult<()> {
        match select_files(paths) {
            Ok(Selection::Cleared) => {
                self.clear_photo();
                Ok(())
            }
            Ok(Selection::Loaded(asset)) => self.attach_photo(asset),
            Err(rejected) => Err(self.reject_selection(rejected)),
        }
    }

    /// Use an in-memory photo, as if it had been picked.
    pub fn attach_photo(&mut self, asset: ImageAsset) -> PlaqueResult<()> {
        let (w, h) = match asset.natural_size() {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(error = %e, name = %asset.name, "photo header unreadable");
                self.clear_photo();
                return Err(self.reject_selection(SelectionRejected::Unreadable(asset.name)));
            }
        };
        self.tracker = LayoutTracker::new(&self.viewport);
        self.tracker.on_image_load(w, h);
        tracing::info!(name = %asset.name, width = w, height = h, "photo attached");
        self.photo = Some(asset);
        self.remount();
        Ok(())
    }

    /// Message input change. Overlong text is refused and the previous message kept.
    pub fn set_message(&mut self, text: &str) -> PlaqueResult<Option<LengthAlert>> {
        match Message::new(text) {
            Ok(message) => {
                self.message = message;
                self.remount();
                Ok(self.message.alert())
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::warning(self.text().textarea.too_long));
                Err(err)
            }
        }
    }

    /// Preview is offered once a photo is attached and the message is non-empty.
    pub fn can_preview(&self) -> bool {
        self.photo.is_some() && !self.message.is_empty()
    }

    pub fn layout(&self) -> LayoutState {
        self.tracker.state()
    }

    pub fn plan(&self) -> Option<PreviewPlan> {
        self.tracker.plan(self.store.state().selected_variant)
    }

    /// Open the preview and mount the compositions it shows.
    pub fn show_preview(&mut self) -> PlaqueResult<PreviewPlan> {
        if !self.can_preview() {
            return Err(PlaqueError::validation(
                "a photo and a non-empty message are required to preview",
            ));
        }
        self.store.dispatch(Action::SetShowPreview(true));
        self.remount();
        self.plan()
            .ok_or_else(|| PlaqueError::validation("photo size is not known yet"))
    }

    pub fn hide_preview(&mut self) {
        self.store.dispatch(Action::SetShowPreview(false));
        self.board.unmount();
    }

    /// Viewport resize; the preview is recomputed from the new width.
    pub fn resize(&mut self, width: f64) -> PlaqueResult<()> {
        self.viewport.resize(width)?;
        self.remount();
        Ok(())
    }

    /// Pick one of the side-by-side variants.
    pub fn select_variant(&mut self, variant: LayoutVariant) -> PlaqueResult<()> {
        let offered = self
            .tracker
            .plan(None)
            .is_some_and(|p| p.rendered.contains(&variant));
        if !offered {
            return Err(PlaqueError::validation(format!(
                "layout {variant:?} is not offered for this photo"
            )));
        }
        self.store.dispatch(Action::SetSelectedVariant(Some(variant)));
        Ok(())
    }

    /// Capture the chosen composition and generate the document.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self) -> PlaqueResult<PathBuf> {
        let state = self.store.state();
        if !state.show_preview {
            return Err(PlaqueError::validation("open the preview before submitting"));
        }
        let plan = self
            .plan()
            .ok_or_else(|| PlaqueError::validation("photo size is not known yet"))?;
        if !plan.can_submit {
            return Err(PlaqueError::validation("choose a layout before submitting"));
        }
        let name = self
            .photo
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default();

        let path = self
            .pipeline
            .capture_and_submit(&self.board, state.selected_variant, &name)
            .await?;
        self.observe_readiness();
        Ok(path)
    }

    /// Drain the session's store subscription and react to the document becoming ready:
    /// close the preview and confirm.
    fn observe_readiness(&mut self) {
        let Some(state) = self.readiness.take_changed() else {
            return;
        };
        if state.is_document_ready && state.show_preview {
            self.hide_preview();
            self.notifier
                .notify(Notification::success(self.text().home.toast));
        }
    }

    /// Back to an empty form. The locale survives.
    pub fn start_over(&mut self) {
        self.store.dispatch(Action::Reset);
        self.pipeline.reset();
        self.board.unmount();
        self.clear_photo();
        self.message = Message::default();
    }

    fn clear_photo(&mut self) {
        self.photo = None;
        self.tracker = LayoutTracker::new(&self.viewport);
        self.revalidate_selection();
        if self.store.state().show_preview {
            self.hide_preview();
        }
    }

    fn reject_selection(&self, rejected: SelectionRejected) -> PlaqueError {
        let text = self.text().selection_message(&rejected);
        self.notifier.notify(Notification::warning(text));
        PlaqueError::from(rejected)
    }

    /// Drop a variant choice the current photo and viewport no longer offer.
    fn revalidate_selection(&self) {
        let Some(selected) = self.store.state().selected_variant else {
            return;
        };
        let offered = self
            .tracker
            .plan(None)
            .is_some_and(|p| p.offer_selection && p.rendered.contains(&selected));
        if !offered {
            tracing::debug!(?selected, "variant choice no longer offered");
            self.store.dispatch(Action::SetSelectedVariant(None));
        }
    }

    fn remount(&mut self) {
        self.revalidate_selection();
        if !self.store.state().show_preview {
            return;
        }
        let (Some(photo), LayoutState::Ready(layout)) = (self.photo.clone(), self.tracker.state())
        else {
            return;
        };
        let Some(plan) = self.plan() else {
            return;
        };
        let message = self.message.clone();
        self.board.mount(&layout, &plan, photo, message);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/plaque_session.rs"]
mod tests;
