// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `ViewportController`.
//!
//! These drive the controller the way a host would: attach an image, resize,
//! tap, scroll, and check the observable state and delegate traffic.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use kurbo::{Point, Size};
use understory_tiled_view::{
    ContentSurface, GeometryKind, ScrollZoomDelegate, TapGesture, TiledImageSource,
    TiledViewError, ViewportController, ZoomAnchor, ZoomPolicy, ZoomState,
};

struct Image {
    size: Size,
    levels: u32,
}

impl TiledImageSource for Image {
    fn image_size(&self) -> Size {
        self.size
    }
    fn zoom_levels(&self) -> u32 {
        self.levels
    }
}

#[derive(Default)]
struct SurfaceLog {
    origin: Option<Point>,
    detached: bool,
}

struct Surface(Rc<RefCell<SurfaceLog>>);

impl ContentSurface for Surface {
    fn set_origin(&mut self, origin: Point) {
        self.0.borrow_mut().origin = Some(origin);
    }
    fn detach(&mut self) {
        self.0.borrow_mut().detached = true;
    }
}

#[derive(Default)]
struct Counter {
    calls: Cell<usize>,
    last_scale: Cell<f64>,
}

impl ScrollZoomDelegate for Counter {
    fn on_scroll_or_zoom(&self, viewport: &ViewportController) {
        self.calls.set(self.calls.get() + 1);
        self.last_scale.set(viewport.scale());
    }
}

fn wide_image() -> Image {
    Image {
        size: Size::new(1000.0, 500.0),
        levels: 5,
    }
}

fn attached() -> (ViewportController, Rc<RefCell<SurfaceLog>>) {
    let mut vc = ViewportController::new(Size::new(300.0, 300.0));
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    vc.attach(&wide_image(), Surface(log.clone())).unwrap();
    (vc, log)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn unattached_controller_ignores_input() {
    let mut vc = ViewportController::new(Size::new(300.0, 300.0));
    assert_eq!(vc.zoom_state(), ZoomState::Unattached);
    assert_eq!(vc.handle_double_tap(Point::new(1.0, 1.0)), None);
    assert_eq!(vc.handle_two_finger_tap(), None);
    vc.update_offset(Point::new(0.5, 0.5));
    assert_eq!(vc.offset(), Point::ZERO);
    assert_eq!(vc.max_content_offset(), Point::ZERO);
    vc.on_viewport_resized(Size::new(100.0, 100.0));
    assert_eq!(vc.scale(), 1.0);
}

#[test]
fn attach_sets_bounds_and_min_scale() {
    let (vc, _log) = attached();
    let bounds = vc.bounds();
    assert!(approx(bounds.min, 0.3));
    assert!(approx(bounds.max, 3.0));
    assert!(approx(vc.scale(), 0.3));
    assert_eq!(vc.zoom_state(), ZoomState::ZoomedOut);
    assert_eq!(vc.content_size(), Some(Size::new(1000.0, 500.0)));
}

#[test]
fn attach_rejects_degenerate_image_and_keeps_previous_content() {
    let (mut vc, old_log) = attached();
    let new_log = Rc::new(RefCell::new(SurfaceLog::default()));
    let err = vc
        .attach(
            &Image {
                size: Size::new(0.0, 500.0),
                levels: 5,
            },
            Surface(new_log.clone()),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TiledViewError::InvalidGeometry {
            kind: GeometryKind::Content,
            ..
        }
    ));
    assert!(!old_log.borrow().detached);
    assert_eq!(new_log.borrow().origin, None);
    assert_eq!(vc.content_size(), Some(Size::new(1000.0, 500.0)));
}

#[test]
fn attach_rejects_degenerate_viewport() {
    let mut vc = ViewportController::new(Size::new(0.0, 300.0));
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    let err = vc.attach(&wide_image(), Surface(log)).unwrap_err();
    assert!(matches!(
        err,
        TiledViewError::InvalidGeometry {
            kind: GeometryKind::Viewport,
            ..
        }
    ));
    assert!(!vc.is_attached());
}

#[test]
fn reattach_detaches_previous_surface() {
    let (mut vc, first) = attached();
    vc.handle_double_tap(Point::new(500.0, 250.0));

    let second = Rc::new(RefCell::new(SurfaceLog::default()));
    let square = Image {
        size: Size::new(600.0, 600.0),
        levels: 1,
    };
    vc.attach(&square, Surface(second.clone())).unwrap();

    assert!(first.borrow().detached);
    assert!(!second.borrow().detached);
    assert!(approx(vc.scale(), 0.5));
    assert!(approx(vc.bounds().max, 1.8));
    assert_eq!(vc.offset(), Point::ZERO);

    vc.detach_content();
    assert!(second.borrow().detached);
    assert_eq!(vc.zoom_state(), ZoomState::Unattached);
}

#[test]
fn double_tap_zooms_toward_tapped_point() {
    let (mut vc, log) = attached();
    let request = vc.handle_double_tap(Point::new(500.0, 250.0)).unwrap();

    assert!(approx(request.target_scale, 0.6));
    let ZoomAnchor::Rect(rect) = request.anchor else {
        panic!("expected a rect anchor");
    };
    assert!(approx(rect.width(), 500.0));
    assert!(approx(rect.height(), 500.0));
    assert!(approx(rect.center().x, 500.0));
    assert!(approx(rect.center().y, 250.0));

    assert!(approx(vc.scale(), 0.6));
    assert_eq!(vc.zoom_state(), ZoomState::ZoomedIn);
    // The tapped point is now in the middle of the viewport horizontally.
    let visible = vc.visible_rect();
    assert!(approx(visible.center().x, 500.0));
    assert!(approx(visible.center().y, 250.0));
    // 600x300 scaled content fills the viewport vertically, so no centering remains.
    assert_eq!(log.borrow().origin, Some(Point::ZERO));
}

#[test]
fn repeated_double_tap_at_max_resets_to_min() {
    let (mut vc, _log) = attached();
    vc.on_host_zoom(3.0);
    assert_eq!(vc.zoom_state(), ZoomState::ZoomedMax);

    for anchor in [Point::new(0.0, 0.0), Point::new(1000.0, 500.0)] {
        vc.on_host_zoom(3.0);
        let request = vc.handle_double_tap(anchor).unwrap();
        assert_eq!(request.anchor, ZoomAnchor::ViewportCenter);
        assert!(approx(vc.scale(), 0.3));
        assert_eq!(vc.zoom_state(), ZoomState::ZoomedOut);
    }
}

#[test]
fn double_taps_walk_up_to_max() {
    let (mut vc, _log) = attached();
    let mut scales = Vec::new();
    for _ in 0..5 {
        vc.handle_double_tap(Point::new(500.0, 250.0));
        scales.push(vc.scale());
    }
    let expected = [0.6, 1.2, 2.4, 3.0, 0.3];
    for (got, want) in scales.iter().zip(expected) {
        assert!(approx(*got, want), "got {got}, want {want}");
    }
}

#[test]
fn two_finger_tap_round_trip() {
    let (mut vc, _log) = attached();
    vc.handle_two_finger_tap();
    assert!(approx(vc.scale(), 3.0));
    vc.handle_two_finger_tap();
    assert!(approx(vc.scale(), 1.5));
    vc.handle_two_finger_tap();
    vc.handle_two_finger_tap();
    vc.handle_two_finger_tap();
    // 1.5 -> 0.75 -> 0.375 -> floored at 0.3.
    assert!(approx(vc.scale(), 0.3));
}

#[test]
fn two_finger_tap_keeps_visible_center() {
    let (mut vc, _log) = attached();
    vc.handle_double_tap(Point::new(400.0, 250.0));
    vc.handle_double_tap(Point::new(400.0, 250.0));
    let before = vc.visible_rect().center();
    vc.handle_two_finger_tap();
    let after = vc.visible_rect().center();
    assert!(approx(before.x, after.x));
    assert!(approx(before.y, after.y));
}

#[test]
fn update_offset_uses_max_scale_frame() {
    let (mut vc, _log) = attached();
    vc.update_offset(Point::new(0.5, 0.5));
    assert_eq!(vc.offset(), Point::new(1500.0, 750.0));
    assert_eq!(vc.max_content_offset(), Point::new(3000.0, 1500.0));

    vc.update_offset(Point::new(-1.0, 4.0));
    assert_eq!(vc.offset(), Point::new(0.0, 1500.0));
}

#[test]
fn shrinking_viewport_keeps_scale_when_in_range() {
    let (mut vc, _log) = attached();
    vc.on_host_zoom(1.0);
    vc.on_viewport_resized(Size::new(150.0, 150.0));
    assert!(approx(vc.bounds().min, 0.15));
    assert!(approx(vc.scale(), 1.0));
}

#[test]
fn resize_forces_clamp_and_notifies() {
    let (mut vc, log) = attached();
    let counter = Rc::new(Counter::default());
    vc.set_delegate(Rc::downgrade(&counter) as Weak<dyn ScrollZoomDelegate>);

    // Growing the viewport raises the fit scale above the current one.
    vc.on_viewport_resized(Size::new(600.0, 600.0));
    assert!(approx(vc.bounds().min, 0.6));
    assert!(approx(vc.scale(), 0.6));
    assert_eq!(counter.calls.get(), 1);
    assert!(approx(counter.last_scale.get(), 0.6));
    // 600x300 content in a 600x600 viewport is centered vertically.
    assert_eq!(log.borrow().origin, Some(Point::new(0.0, 150.0)));
}

#[test]
fn resize_clamps_offset_even_when_scale_survives() {
    let (mut vc, _log) = attached();
    let counter = Rc::new(Counter::default());
    vc.on_host_zoom(3.0);
    // Bottom-right corner of the 3000x1500 scaled image.
    vc.on_host_scroll(Point::new(2700.0, 1200.0));
    vc.set_delegate(Rc::downgrade(&counter) as Weak<dyn ScrollZoomDelegate>);

    vc.on_viewport_resized(Size::new(600.0, 600.0));
    assert!(approx(vc.scale(), 3.0));
    assert_eq!(vc.offset(), Point::new(2400.0, 900.0));
    assert_eq!(counter.calls.get(), 1);
    let visible = vc.visible_rect();
    assert!(visible.max_x() <= 1000.0 + 1e-9, "{visible:?}");
    assert!(visible.max_y() <= 500.0 + 1e-9, "{visible:?}");
}

#[test]
fn attach_rejects_policy_without_usable_max_scale() {
    let policy = ZoomPolicy {
        max_scale_per_level: 0.0,
        ..ZoomPolicy::default()
    };
    let mut vc = ViewportController::with_policy(Size::new(300.0, 300.0), policy);
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    let err = vc.attach(&wide_image(), Surface(log.clone()));
    assert_eq!(
        err,
        Err(TiledViewError::InvalidMaxScale {
            max_scale: 0.0,
            zoom_levels: 5,
        })
    );
    assert!(!vc.is_attached());
    assert_eq!(vc.zoom_controller().policy().max_scale_per_level, 0.0);
    assert!(approx(vc.scale(), 1.0));
    assert!(log.borrow().origin.is_none());
}

#[test]
fn zoom_controller_tracks_attached_bounds() {
    let (mut vc, _log) = attached();
    let zoom = vc.zoom_controller();
    assert_eq!(zoom.bounds(), vc.bounds());
    assert_eq!(zoom.state(), ZoomState::ZoomedOut);
    assert!(zoom.is_at_min());

    vc.on_host_zoom(10.0);
    let zoom = vc.zoom_controller();
    assert!(zoom.is_at_max());
    assert_eq!(zoom.state(), ZoomState::ZoomedMax);
}

#[test]
fn content_resize_recenters_without_rederiving_bounds() {
    let (mut vc, log) = attached();
    let bounds = vc.bounds();
    log.borrow_mut().origin = None;
    vc.on_content_resized();
    assert_eq!(vc.bounds(), bounds);
    assert_eq!(log.borrow().origin, Some(Point::new(0.0, 75.0)));
}

#[test]
fn degenerate_resize_keeps_previous_bounds() {
    let (mut vc, _log) = attached();
    let bounds = vc.bounds();
    vc.on_viewport_resized(Size::new(0.0, 0.0));
    assert_eq!(vc.bounds(), bounds);

    // The next valid size is still treated as a change.
    vc.on_viewport_resized(Size::new(600.0, 600.0));
    assert!(approx(vc.bounds().min, 0.6));
}

#[test]
fn delegate_sees_every_change_and_can_go_away() {
    let (mut vc, _log) = attached();
    let counter = Rc::new(Counter::default());
    vc.set_delegate(Rc::downgrade(&counter) as Weak<dyn ScrollZoomDelegate>);

    vc.on_host_scroll(Point::new(10.0, 0.0));
    vc.on_host_zoom(1.0);
    vc.handle_double_tap(Point::new(100.0, 100.0));
    vc.notify_scroll_or_zoom();
    assert_eq!(counter.calls.get(), 4);

    drop(counter);
    vc.on_host_scroll(Point::new(20.0, 0.0));
    vc.clear_delegate();
    vc.notify_scroll_or_zoom();
}

#[test]
fn host_zoom_is_clamped_into_bounds() {
    let (mut vc, _log) = attached();
    vc.on_host_zoom(50.0);
    assert!(approx(vc.scale(), 3.0));
    vc.on_host_zoom(-2.0);
    assert!(approx(vc.scale(), 0.3));
    vc.on_host_zoom(f64::NAN);
    assert!(approx(vc.scale(), 0.3));
}

#[test]
fn gesture_position_is_converted_to_content_space() {
    let (mut vc, _log) = attached();
    // At 0.3 the 1000x500 image is 300x150, centered 75 units down.
    let request = vc
        .handle_tap_gesture(TapGesture::DoubleTap {
            position: Point::new(150.0, 150.0),
        })
        .unwrap();
    let ZoomAnchor::Rect(rect) = request.anchor else {
        panic!("expected a rect anchor");
    };
    assert!(approx(rect.center().x, 500.0));
    assert!(approx(rect.center().y, 250.0));

    let request = vc.handle_tap_gesture(TapGesture::TwoFingerTap).unwrap();
    assert_eq!(request.anchor, ZoomAnchor::ViewportCenter);
}

#[test]
fn animated_zoom_advances_and_last_request_wins() {
    let policy = ZoomPolicy::default().with_animation(true, Duration::from_millis(100));
    let mut vc = ViewportController::with_policy(Size::new(300.0, 300.0), policy);
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    vc.attach(&wide_image(), Surface(log)).unwrap();

    let request = vc.handle_double_tap(Point::new(500.0, 250.0)).unwrap();
    assert!(request.animated);
    assert!(vc.is_animating());
    assert!(approx(vc.scale(), 0.3));

    assert!(vc.advance(Duration::from_millis(50)));
    let mid = vc.scale();
    assert!(mid > 0.3 && mid < 0.6);

    // A two-finger tap mid-flight replaces the zoom-in.
    vc.handle_two_finger_tap();
    while vc.advance(Duration::from_millis(30)) {}
    assert!(!vc.is_animating());
    assert!(approx(vc.scale(), (mid / 2.0).max(0.3)));
    assert!(!vc.advance(Duration::from_millis(30)));
}

#[test]
fn host_input_cancels_animation() {
    let policy = ZoomPolicy::default().with_animation(true, Duration::from_millis(100));
    let mut vc = ViewportController::with_policy(Size::new(300.0, 300.0), policy);
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    vc.attach(&wide_image(), Surface(log)).unwrap();

    vc.handle_double_tap(Point::new(500.0, 250.0));
    assert!(vc.is_animating());
    vc.on_host_scroll(Point::new(5.0, 5.0));
    assert!(!vc.is_animating());
    assert_eq!(vc.offset(), Point::new(5.0, 5.0));
}

#[test]
fn animation_respects_bounds_changed_mid_flight() {
    let policy = ZoomPolicy::default().with_animation(true, Duration::from_millis(100));
    let mut vc = ViewportController::with_policy(Size::new(300.0, 300.0), policy);
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    vc.attach(&wide_image(), Surface(log)).unwrap();

    // Heading for 0.6, but the viewport grows so the minimum becomes 1.2.
    vc.handle_double_tap(Point::new(500.0, 250.0));
    vc.on_viewport_resized(Size::new(1200.0, 1200.0));
    while vc.advance(Duration::from_millis(20)) {}
    assert!(approx(vc.scale(), 1.2));
    assert!(vc.bounds().contains(vc.scale()));
}

#[test]
fn debug_info_reflects_state() {
    let (vc, _log) = attached();
    let info = vc.debug_info();
    assert_eq!(info.viewport_size, Size::new(300.0, 300.0));
    assert_eq!(info.state, ZoomState::ZoomedOut);
    assert!(!info.animating);
    assert!(info.bounds.min <= info.bounds.max);
    // The whole image is visible at the minimum scale.
    assert!(info.visible_rect.min_x() <= 1e-9);
    assert!(info.visible_rect.max_x() >= 1000.0 - 1e-9);
    assert!(info.visible_rect.min_y() <= 1e-9);
    assert!(info.visible_rect.max_y() >= 500.0 - 1e-9);
}
