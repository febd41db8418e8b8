use super::*;
use std::{io::Cursor, sync::Mutex};

use crate::{
    capture::board::CaptureScene,
    capture::service::UploadFile,
    foundation::core::Canvas,
    session::notify::{Level, RecordingNotifier},
    upload::transport::TransportResponse,
};

struct FixedRenderer;

impl Renderer for FixedRenderer {
    fn render(&self, _scene: &CaptureScene, _target: Canvas) -> PlaqueResult<Vec<u8>> {
        Ok(vec![1, 2, 3, 4])
    }
}

#[derive(Default)]
struct OkTransport {
    names: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Transport for OkTransport {
    async fn post_generate(
        &self,
        _endpoint: &str,
        _image: UploadFile,
        name: &str,
    ) -> PlaqueResult<TransportResponse> {
        self.names.lock().unwrap().push(name.to_string());
        Ok(TransportResponse {
            status: 200,
            body: b"%PDF".to_vec(),
        })
    }
}

#[derive(Default)]
struct MemorySink {
    files: Mutex<Vec<String>>,
}

impl DownloadSink for MemorySink {
    fn deliver(&self, file_name: &str, _bytes: &[u8]) -> PlaqueResult<PathBuf> {
        self.files.lock().unwrap().push(file_name.to_string());
        Ok(PathBuf::from(file_name))
    }
}

struct Fixture {
    session: PlaqueSession,
    notes: Arc<RecordingNotifier>,
    sink: Arc<MemorySink>,
}

fn fixture(width: f64) -> Fixture {
    let notes = Arc::new(RecordingNotifier::new());
    let sink = Arc::new(MemorySink::default());
    let deps = SessionDeps {
        renderer: Arc::new(FixedRenderer),
        transport: Arc::new(OkTransport::default()),
        sink: sink.clone(),
        notifier: notes.clone(),
    };
    let opts = PlaqueSessionOpts {
        viewport_width: width,
        ..PlaqueSessionOpts::default()
    };
    let session = PlaqueSession::new(&PipelineConfig::default(), opts, deps).unwrap();
    Fixture {
        session,
        notes,
        sink,
    }
}

fn photo(name: &str, w: u32, h: u32) -> ImageAsset {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageAsset::from_bytes(name, buf).unwrap()
}

#[test]
fn preview_requires_photo_and_message() {
    let mut f = fixture(1280.0);
    assert!(!f.session.can_preview());
    assert!(f.session.show_preview().is_err());

    f.session.attach_photo(photo("cat.png", 40, 40)).unwrap();
    assert!(!f.session.can_preview());

    f.session.set_message("Hello").unwrap();
    assert!(f.session.can_preview());
    let plan = f.session.show_preview().unwrap();
    assert_eq!(plan.rendered, vec![LayoutVariant::Primary]);
    assert!(f.session.state().show_preview);
    assert_eq!(f.session.board().regions().len(), 1);
}

#[test]
fn overlong_message_warns_and_keeps_previous() {
    let mut f = fixture(1280.0);
    f.session.set_message("short").unwrap();
    assert!(f.session.set_message(&"x".repeat(26)).is_err());
    assert_eq!(f.session.message().as_str(), "short");

    let notes = f.notes.take();
    assert_eq!(notes, vec![Notification::warning("Message cannot exceed 25 characters.")]);
}

#[test]
fn message_alert_is_reported() {
    let mut f = fixture(1280.0);
    assert_eq!(
        f.session.set_message(&"x".repeat(25)).unwrap(),
        Some(LengthAlert::LimitReached)
    );
}

#[test]
fn multiple_files_are_rejected_and_photo_kept() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("a.png", 10, 10)).unwrap();
    let err = f
        .session
        .select_files(&[PathBuf::from("a.png"), PathBuf::from("b.png")])
        .unwrap_err();
    assert!(matches!(err, PlaqueError::Validation(_)));
    assert!(f.session.photo().is_some());
    assert_eq!(f.notes.take()[0].text, "Please select only one image.");
}

#[test]
fn empty_selection_clears_photo() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("a.png", 10, 10)).unwrap();
    f.session.select_files(&[]).unwrap();
    assert!(f.session.photo().is_none());
    assert_eq!(f.session.layout(), LayoutState::Loading);
}

#[test]
fn unreadable_file_warns() {
    let mut f = fixture(1280.0);
    let dir = tempfile::tempdir().unwrap();
    assert!(
        f.session
            .select_files(&[dir.path().join("missing.png")])
            .is_err()
    );
    assert_eq!(f.notes.take()[0].level, Level::Warning);

    let bogus = ImageAsset::from_bytes("bogus.jpg", vec![0, 1, 2]).unwrap();
    assert!(f.session.attach_photo(bogus).is_err());
    assert!(f.session.photo().is_none());
}

#[tokio::test]
async fn wide_photo_needs_a_choice_then_submits() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("Beach.JPG", 80, 40)).unwrap();
    f.session.set_message("Summer").unwrap();
    let plan = f.session.show_preview().unwrap();
    assert_eq!(plan.rendered.len(), 2);
    assert!(plan.offer_selection);
    assert!(!plan.can_submit);
    assert!(f.session.submit().await.is_err());

    f.session.select_variant(LayoutVariant::Secondary).unwrap();
    let path = f.session.submit().await.unwrap();
    assert_eq!(path, PathBuf::from("Beach.pdf"));
    assert_eq!(*f.sink.files.lock().unwrap(), vec!["Beach.pdf".to_string()]);

    let s = f.session.state();
    assert!(s.is_document_ready);
    assert!(!s.show_preview);
    assert!(f.session.board().regions().is_empty());
    let notes = f.notes.take();
    assert_eq!(notes.last(), Some(&Notification::success("Your PDF is ready!")));
    assert_eq!(f.notes.count(Level::Error), 0);
}

#[test]
fn narrow_viewport_submits_single_layout() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("w.png", 80, 40)).unwrap();
    f.session.set_message("Hi").unwrap();
    f.session.show_preview().unwrap();
    assert_eq!(f.session.board().regions().len(), 2);

    f.session.resize(800.0).unwrap();
    let plan = f.session.plan().unwrap();
    assert!(plan.can_submit);
    assert_eq!(f.session.board().regions().len(), 1);
    assert!(f.session.select_variant(LayoutVariant::Secondary).is_err());
}

#[tokio::test]
async fn start_over_resets_but_keeps_locale() {
    let mut f = fixture(800.0);
    f.session.set_locale("fr");
    f.session.attach_photo(photo("p.png", 20, 20)).unwrap();
    f.session.set_message("Salut").unwrap();
    f.session.show_preview().unwrap();
    f.session.submit().await.unwrap();
    assert_eq!(f.session.upload_state(), UploadState::Ready);
    assert_eq!(f.notes.take().last().unwrap().text, "Votre PDF est prêt !");

    f.session.start_over();
    let s = f.session.state();
    assert_eq!(s.locale, "fr");
    assert!(!s.is_document_ready);
    assert_eq!(f.session.upload_state(), UploadState::Idle);
    assert!(f.session.photo().is_none());
    assert!(f.session.message().is_empty());
}

#[tokio::test]
async fn new_photo_drops_choice_it_no_longer_offers() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("wide.png", 80, 40)).unwrap();
    f.session.set_message("Hi").unwrap();
    f.session.show_preview().unwrap();
    f.session.select_variant(LayoutVariant::Secondary).unwrap();

    f.session.attach_photo(photo("tall.png", 40, 80)).unwrap();
    assert_eq!(f.session.state().selected_variant, None);
    assert!(f.session.plan().unwrap().can_submit);
    assert_eq!(f.session.submit().await.unwrap(), PathBuf::from("tall.pdf"));
    assert_eq!(f.notes.count(Level::Error), 0);
}

#[tokio::test]
async fn narrowing_viewport_drops_choice() {
    let mut f = fixture(1280.0);
    f.session.attach_photo(photo("wide.png", 80, 40)).unwrap();
    f.session.set_message("Hi").unwrap();
    f.session.show_preview().unwrap();
    f.session.select_variant(LayoutVariant::Secondary).unwrap();

    f.session.resize(800.0).unwrap();
    assert_eq!(f.session.state().selected_variant, None);
    assert_eq!(f.session.submit().await.unwrap(), PathBuf::from("wide.pdf"));
    assert!(!f.session.state().show_preview);
}

#[tokio::test]
async fn readiness_is_confirmed_once() {
    let mut f = fixture(800.0);
    f.session.attach_photo(photo("p.png", 20, 20)).unwrap();
    f.session.set_message("Hi").unwrap();
    f.session.show_preview().unwrap();
    f.session.submit().await.unwrap();
    assert_eq!(f.notes.count(Level::Success), 1);

    f.session.show_preview().unwrap();
    assert!(f.session.submit().await.is_err());
    assert_eq!(f.notes.count(Level::Success), 1);
}
