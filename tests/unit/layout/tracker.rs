use super::*;

#[test]
fn loading_until_image_reports_natural_size() {
    let viewport = Viewport::new(1024.0).unwrap();
    let mut tracker = LayoutTracker::new(&viewport);
    assert_eq!(tracker.state(), LayoutState::Loading);
    assert!(tracker.plan(None).is_none());

    assert_eq!(tracker.on_image_load(0, 0), LayoutState::Loading);

    let state = tracker.on_image_load(800, 400);
    let layout = state.layout().unwrap();
    assert_eq!(layout.primary.image_height, 250.0);
}

#[test]
fn resize_recomputes_with_new_breakpoint() {
    let viewport = Viewport::new(1024.0).unwrap();
    let mut tracker = LayoutTracker::new(&viewport);
    tracker.on_image_load(800, 400);

    viewport.resize(480.0).unwrap();
    let layout = *tracker.state().layout().unwrap();
    assert_eq!(layout.breakpoint.container_size, 300.0);
    assert_eq!(layout.primary.image_height, 150.0);
}

#[test]
fn listener_deregisters_on_drop() {
    let viewport = Viewport::new(1024.0).unwrap();
    assert_eq!(viewport.listener_count(), 0);
    {
        let _tracker = LayoutTracker::new(&viewport);
        assert_eq!(viewport.listener_count(), 1);
    }
    assert_eq!(viewport.listener_count(), 0);
    viewport.resize(700.0).unwrap();
    assert_eq!(viewport.width(), 700.0);
}

#[tokio::test]
async fn next_change_follows_resize_and_ends_with_viewport() {
    let viewport = Viewport::new(1280.0).unwrap();
    let mut tracker = LayoutTracker::new(&viewport);
    tracker.on_image_load(300, 300);

    viewport.resize(320.0).unwrap();
    let state = tracker.next_change().await.unwrap();
    assert_eq!(state.layout().unwrap().breakpoint.container_size, 300.0);

    drop(viewport);
    assert!(tracker.next_change().await.is_none());
}

#[test]
fn resize_rejects_negative_width() {
    let viewport = Viewport::new(1024.0).unwrap();
    assert!(viewport.resize(-5.0).is_err());
    assert_eq!(viewport.width(), 1024.0);
}
