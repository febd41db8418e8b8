use super::*;
use crate::{
    assets::image::ImageAsset,
    assets::message::Message,
    capture::board::CaptureScene,
    layout::engine::{AspectRatio, LayoutVariant, PreviewPlan, compute_dimensions},
};

struct FixedRenderer(Vec<u8>);

impl Renderer for FixedRenderer {
    fn render(&self, _scene: &CaptureScene, _target: Canvas) -> PlaqueResult<Vec<u8>> {
        Ok(self.0.clone())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _scene: &CaptureScene, _target: Canvas) -> PlaqueResult<Vec<u8>> {
        Err(PlaqueError::validation("surface lost"))
    }
}

fn board(aspect: f64, width: f64) -> PreviewBoard {
    let aspect = AspectRatio::new(aspect).unwrap();
    let mut board = PreviewBoard::new();
    board.mount(
        &compute_dimensions(aspect, width),
        &PreviewPlan::new(aspect, width, None),
        ImageAsset::from_bytes("p.jpg", vec![1, 2, 3]).unwrap(),
        Message::new("merci").unwrap(),
    );
    board
}

#[test]
fn default_options_match_capture_contract() {
    let o = CaptureOptions::default();
    assert_eq!((o.width, o.height), (500, 500));
    assert!((o.quality - 0.8).abs() < f32::EPSILON);
}

#[test]
fn rejects_out_of_range_quality() {
    let o = CaptureOptions {
        quality: 1.5,
        ..CaptureOptions::default()
    };
    assert!(o.validate().is_err());
    assert!(CaptureService::new(Arc::new(FailingRenderer), o).is_err());
}

#[tokio::test]
async fn upload_file_keeps_length_and_png_mime() {
    let payload = vec![7u8; 1234];
    let svc =
        CaptureService::new(Arc::new(FixedRenderer(payload)), CaptureOptions::default()).unwrap();
    let board = board(2.0, 1280.0);
    let handle = board.select(Some(LayoutVariant::Secondary)).unwrap();

    let raster = svc.capture(&board, handle).await.unwrap();
    assert_eq!((raster.width, raster.height), (500, 500));
    let len = raster.len();
    let file = raster.into_upload_file("photo.jpg");
    assert_eq!(file.bytes.len(), len);
    assert_eq!(file.mime, "image/png");
    assert_eq!(file.file_name, "photo.jpg");
}

#[tokio::test]
async fn renderer_failure_becomes_capture_error() {
    let svc = CaptureService::new(Arc::new(FailingRenderer), CaptureOptions::default()).unwrap();
    let board = board(1.0, 800.0);
    let handle = board.select(None).unwrap();
    let err = svc.capture(&board, handle).await.unwrap_err();
    assert!(matches!(err, PlaqueError::Capture(_)));
    assert!(err.to_string().contains("surface lost"));
}

#[tokio::test]
async fn detached_region_is_capture_error() {
    let svc =
        CaptureService::new(Arc::new(FixedRenderer(vec![1])), CaptureOptions::default()).unwrap();
    let mut board = board(1.0, 800.0);
    let handle = board.select(None).unwrap();
    board.unmount();
    let err = svc.capture(&board, handle).await.unwrap_err();
    assert!(matches!(err, PlaqueError::Capture(_)));
}

#[tokio::test]
async fn empty_render_output_is_rejected() {
    let svc = CaptureService::new(Arc::new(FixedRenderer(Vec::new())), CaptureOptions::default())
        .unwrap();
    let board = board(1.0, 800.0);
    let handle = board.select(None).unwrap();
    assert!(svc.capture(&board, handle).await.is_err());
}
