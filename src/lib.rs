//! photoplaque composes a photo and a short message into a printable plaque.
//!
//! The flow mirrors the interactive form it backs:
//!
//! - Attach a photo and type a message (at most 25 characters)
//! - Compute the responsive layout and open the preview
//! - Capture the chosen composition as a 500x500 PNG
//! - Post it to the generation service and deliver the returned PDF
//!
//! UI state lives in a [`Store`] driven by [`Action`]s; the rendering surface, HTTP transport,
//! download target and notifications are injectable.
#![forbid(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod foundation;
pub mod i18n;
pub mod layout;
pub mod session;
pub mod state;
pub mod upload;

pub use crate::assets::image::{ImageAsset, ImageMime, Selection, SelectionRejected, select_files};
pub use crate::assets::message::{LengthAlert, MAX_MESSAGE_CHARS, Message};
pub use crate::capture::board::{CaptureScene, PreviewBoard, RegionHandle};
pub use crate::capture::cpu::CpuRenderer;
pub use crate::capture::renderer::{Renderer, Theme};
pub use crate::capture::service::{CaptureOptions, CaptureService, RasterBytes, UploadFile};
pub use crate::foundation::config::PipelineConfig;
pub use crate::foundation::core::{Canvas, Rgba8};
pub use crate::foundation::error::{ErrorKind, PlaqueError, PlaqueResult};
pub use crate::i18n::catalog::{Catalog, Locale, catalog};
pub use crate::layout::engine::{
    AspectRatio, Breakpoint, Dimensions, Layout, LayoutVariant, PreviewPlan, compute_dimensions,
};
pub use crate::layout::tracker::{LayoutState, LayoutTracker, Viewport};
pub use crate::session::notify::{Level, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use crate::session::plaque_session::{PlaqueSession, PlaqueSessionOpts, SessionDeps};
pub use crate::state::store::{Action, AppState, StateSubscription, Store, reduce};
pub use crate::upload::download::{DirectorySink, DownloadSink};
pub use crate::upload::pipeline::{UploadPipeline, UploadState, clean_base_name};
pub use crate::upload::transport::{ReqwestTransport, Transport, TransportResponse};
