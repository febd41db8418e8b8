use super::*;
use crate::layout::engine::{AspectRatio, compute_dimensions};

fn mounted(aspect: f64, width: f64) -> (PreviewBoard, Vec<RegionHandle>) {
    let aspect = AspectRatio::new(aspect).unwrap();
    let layout = compute_dimensions(aspect, width);
    let plan = PreviewPlan::new(aspect, width, None);
    let photo = ImageAsset::from_bytes("p.png", vec![0u8; 4]).unwrap();
    let mut board = PreviewBoard::new();
    let handles = board.mount(&layout, &plan, photo, Message::new("hello").unwrap());
    (board, handles)
}

#[test]
fn mounts_both_variants_side_by_side() {
    let (board, handles) = mounted(2.0, 1280.0);
    assert_eq!(handles.len(), 2);
    assert_eq!(board.regions()[1].variant, LayoutVariant::Secondary);
    assert_eq!(board.regions()[1].dims.image_height, 420.0);
}

#[test]
fn selection_policy_prefers_explicit_choice() {
    let (board, _) = mounted(2.0, 1280.0);
    let h = board.select(Some(LayoutVariant::Secondary)).unwrap();
    assert_eq!(h.variant, LayoutVariant::Secondary);
    let h = board.select(None).unwrap();
    assert_eq!(h.variant, LayoutVariant::Primary);
}

#[test]
fn selecting_unmounted_variant_is_capture_error() {
    let (board, _) = mounted(1.0, 1280.0);
    let err = board.select(Some(LayoutVariant::Secondary)).unwrap_err();
    assert!(matches!(err, PlaqueError::Capture(_)));
}

#[test]
fn scene_carries_photo_message_and_dims() {
    let (board, handles) = mounted(2.0, 800.0);
    let scene = board.scene(handles[0]).unwrap();
    assert_eq!(scene.message, "hello");
    assert_eq!(scene.container_size, 500.0);
    assert_eq!(scene.dims.image_height, 250.0);
    assert_eq!(scene.background, None);
}

#[test]
fn stale_handle_after_unmount_is_detached() {
    let (mut board, handles) = mounted(2.0, 1280.0);
    board.unmount();
    let err = board.scene(handles[0]).unwrap_err();
    assert!(err.to_string().contains("detached"));
    assert!(board.select(None).is_err());
}

#[test]
fn translucent_background_is_ignored() {
    let board = PreviewBoard::new().with_background(Some(Rgba8::new(1, 2, 3, 100)));
    assert_eq!(board.background, None);
    let board = PreviewBoard::new().with_background(Some(Rgba8::opaque(1, 2, 3)));
    assert_eq!(board.background, Some(Rgba8::opaque(1, 2, 3)));
}
