use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::watch;

use crate::{
    capture::board::PreviewBoard,
    capture::service::{CaptureService, RasterBytes},
    foundation::error::{PlaqueError, PlaqueResult, UNKNOWN_ERROR_MESSAGE},
    i18n::catalog::{Catalog, catalog},
    layout::engine::LayoutVariant,
    session::notify::{Notification, Notifier},
    state::store::{Action, Store},
    upload::download::DownloadSink,
    upload::transport::Transport,
};

/// Base name used when the photo name is empty.
pub const DEFAULT_BASE_NAME: &str = "generated";

const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Progress of one submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    #[default]
    Idle,
    Capturing,
    Uploading,
    Ready,
    Error,
}

impl UploadState {
    /// Forward-only transitions plus the explicit reset of a finished run.
    pub fn can_advance_to(self, next: UploadState) -> bool {
        use UploadState::*;
        matches!(
            (self, next),
            (Idle, Capturing)
                | (Idle, Uploading)
                | (Capturing, Uploading)
                | (Capturing, Error)
                | (Uploading, Ready)
                | (Uploading, Error)
                | (Ready, Idle)
                | (Error, Idle)
        )
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Capturing | Self::Uploading)
    }
}

/// Strip a trailing `.jpg`/`.jpeg`/`.png` (any case); empty names become [`DEFAULT_BASE_NAME`].
pub fn clean_base_name(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let lower = name.to_ascii_lowercase();
    let base = IMAGE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(name, |ext| &name[..name.len() - ext.len()]);
    if base.is_empty() || base == "." || base == ".." {
        DEFAULT_BASE_NAME.to_string()
    } else {
        base.to_string()
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Message of a non-2xx `{"error": "..."}` body, or the generic fallback.
pub fn error_message_from_body(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}

/// Captures the selected composition, posts it to the generation endpoint and delivers the
/// returned document as `<base>.pdf`.
///
/// At most one submission runs at a time; overlapping calls fail fast with
/// [`PlaqueError::Busy`] and never reach the transport.
pub struct UploadPipeline {
    capture: CaptureService,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DownloadSink>,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
    endpoint: String,
    state: watch::Sender<UploadState>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state())
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl UploadPipeline {
    pub fn new(
        capture: CaptureService,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn DownloadSink>,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
        endpoint: impl Into<String>,
    ) -> Self {
        let (state, _rx) = watch::channel(UploadState::Idle);
        Self {
            capture,
            transport,
            sink,
            store,
            notifier,
            endpoint: endpoint.into(),
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> UploadState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return a finished run (Ready or Error) to Idle.
    pub fn reset(&self) {
        if !self.in_flight.load(Ordering::Acquire) {
            self.advance(UploadState::Idle);
        }
    }

    /// Capture the region chosen by the selection policy and upload it.
    #[tracing::instrument(skip(self, board))]
    pub async fn capture_and_submit(
        &self,
        board: &PreviewBoard,
        selected: Option<LayoutVariant>,
        name: &str,
    ) -> PlaqueResult<PathBuf> {
        let mut run = self.begin(UploadState::Capturing)?;
        let text = self.text();
        self.store.dispatch(Action::SetBusy(true));
        self.store
            .dispatch(Action::SetBusyMessage(text.busy.transforming.to_string()));

        let captured = match board.select(selected) {
            Ok(handle) => self.capture.capture(board, handle).await,
            Err(e) => Err(e),
        };
        let result = match captured {
            Ok(raster) => self.upload(raster, name).await,
            Err(e) => Err(e),
        };
        self.settle(&mut run, result)
    }

    /// Upload an already captured raster.
    #[tracing::instrument(skip(self, raster), fields(len = raster.len()))]
    pub async fn submit(&self, raster: RasterBytes, name: &str) -> PlaqueResult<PathBuf> {
        let mut run = self.begin(UploadState::Uploading)?;
        self.store.dispatch(Action::SetBusy(true));
        let result = self.upload(raster, name).await;
        self.settle(&mut run, result)
    }

    fn begin(&self, first: UploadState) -> PlaqueResult<InFlight<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(self.reject(
                PlaqueError::busy("an upload is already in progress"),
                "duplicate submit rejected",
            ));
        }
        let run = InFlight {
            pipeline: self,
            settled: false,
        };

        match self.state() {
            UploadState::Ready => {
                return Err(self.reject(
                    PlaqueError::validation(
                        "a document was already generated; start over before submitting again",
                    ),
                    "submit rejected until reset",
                ));
            }
            UploadState::Error => self.advance(UploadState::Idle),
            _ => {}
        }
        self.advance(first);
        Ok(run)
    }

    fn reject(&self, err: PlaqueError, what: &'static str) -> PlaqueError {
        tracing::warn!(error = %err, "{what}");
        self.notifier
            .notify(Notification::warning(self.text().error_toast(&err.user_message())));
        err
    }

    async fn upload(&self, raster: RasterBytes, name: &str) -> PlaqueResult<PathBuf> {
        self.advance(UploadState::Uploading);
        self.store
            .dispatch(Action::SetBusyMessage(self.text().busy.generating.to_string()));

        let base = clean_base_name(name);
        let part_name = if name.trim().is_empty() {
            DEFAULT_BASE_NAME
        } else {
            name
        };
        let file = raster.into_upload_file(part_name);
        let response = self
            .transport
            .post_generate(&self.endpoint, file, part_name)
            .await?;

        if !response.is_success() {
            let message = error_message_from_body(&response.body);
            return Err(PlaqueError::network(Some(response.status), message));
        }
        self.sink.deliver(&format!("{base}.pdf"), &response.body)
    }

    fn settle(&self, run: &mut InFlight<'_>, result: PlaqueResult<PathBuf>) -> PlaqueResult<PathBuf> {
        run.settled = true;
        self.store.dispatch(Action::SetBusy(false));
        self.store.dispatch(Action::SetBusyMessage(String::new()));
        match result {
            Ok(path) => {
                self.advance(UploadState::Ready);
                self.store.dispatch(Action::SetDocumentReady(true));
                tracing::info!(path = %path.display(), "document ready");
                Ok(path)
            }
            Err(err) => {
                self.advance(UploadState::Error);
                tracing::error!(error = %err, kind = ?err.kind(), "submission failed");
                self.notifier
                    .notify(Notification::error(self.text().error_toast(&err.user_message())));
                Err(err)
            }
        }
    }

    fn abandon(&self) {
        tracing::warn!(state = ?self.state(), "submission dropped before completion");
        self.state.send_replace(UploadState::Idle);
        self.store.dispatch(Action::SetBusy(false));
        self.store.dispatch(Action::SetBusyMessage(String::new()));
    }

    fn advance(&self, next: UploadState) {
        self.state.send_if_modified(|cur| {
            if cur.can_advance_to(next) {
                tracing::debug!(from = ?*cur, to = ?next, "upload state");
                *cur = next;
                true
            } else {
                false
            }
        });
    }

    fn text(&self) -> &'static Catalog {
        catalog(&self.store.state().locale)
    }
}

/// Holds the single-flight slot. Released on drop, including when the submit future is dropped
/// mid-flight, in which case the pipeline returns to Idle and busy flags are cleared.
struct InFlight<'a> {
    pipeline: &'a UploadPipeline,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled && self.pipeline.state().is_in_flight() {
            self.pipeline.abandon();
        }
        self.pipeline.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upload/pipeline.rs"]
mod tests;
