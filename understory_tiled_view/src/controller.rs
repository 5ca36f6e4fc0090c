// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewport controller and the host-facing traits it drives.
//!
//! [`ViewportController`] ties the stateless pieces together: it derives
//! [`ZoomBounds`] on attach and on viewport resizes, turns tap gestures into
//! [`ZoomRequest`]s via its [`ZoomController`], steps [`ZoomTransition`]s from
//! [`ViewportController::advance`], and keeps the content and view transforms
//! in sync with the scroll offset and scale.
//!
//! Hosts implement [`TiledImageSource`] for the image metadata,
//! [`ContentSurface`] for the tile-rendering surface, and optionally
//! [`ScrollZoomDelegate`] to observe every scroll or zoom change.

use alloc::boxed::Box;
use alloc::rc::Weak;
use core::fmt;
use core::time::Duration;

use kurbo::{Affine, Point, Rect, Size};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::geometry::{ZoomBounds, compute_centering_offset, compute_zoom_bounds_with};
use crate::gesture::TapGesture;
use crate::mapper::{max_offset, offset_for_fraction};
use crate::policy::ZoomPolicy;
use crate::transition::ZoomTransition;
use crate::zoom::{ZoomAnchor, ZoomController, ZoomRequest, ZoomState};

/// Supplies the image being displayed.
///
/// Only the extent and level count are read, once, during
/// [`ViewportController::attach`]. Tile lookup is the business of the
/// [`ContentSurface`] the host pairs with the source.
pub trait TiledImageSource {
    /// Unscaled image dimensions.
    fn image_size(&self) -> Size;
    /// Number of discrete zoom levels the tile source provides.
    fn zoom_levels(&self) -> u32;
}

/// The host-side surface that renders tiles for the attached image.
pub trait ContentSurface {
    /// Moves the surface so its top-left corner sits at `origin` in scroll-content space.
    fn set_origin(&mut self, origin: Point);
    /// Removes the surface from the host view hierarchy.
    ///
    /// Called exactly once, before the surface is dropped by the controller.
    fn detach(&mut self);
}

/// Receives a callback for every scroll or zoom change.
///
/// Callbacks are synchronous and undebounced; implementations should be cheap
/// or throttle on their own.
pub trait ScrollZoomDelegate {
    /// Called after the viewport's scroll offset or zoom scale changed.
    fn on_scroll_or_zoom(&self, viewport: &ViewportController);
}

struct AttachedContent {
    size: Size,
    zoom_levels: u32,
    surface: Box<dyn ContentSurface>,
}

impl fmt::Debug for AttachedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedContent")
            .field("size", &self.size)
            .field("zoom_levels", &self.zoom_levels)
            .finish_non_exhaustive()
    }
}

/// Pan/zoom orchestrator for a large tiled image shown through a fixed-size viewport.
///
/// `ViewportController` owns the observable viewport state (scroll offset,
/// zoom scale, centering origin) and is the only place it changes. Hosts feed
/// it:
/// - Content via [`Self::attach`].
/// - Layout changes via [`Self::on_viewport_resized`] and
///   [`Self::on_content_resized`].
/// - Zoom gestures via [`Self::handle_double_tap`],
///   [`Self::handle_two_finger_tap`], or [`Self::handle_tap_gesture`].
/// - Their own scroll/pinch results via [`Self::on_host_scroll`] and
///   [`Self::on_host_zoom`].
///
/// Offsets are scroll-content coordinates: the content is drawn at
/// `content_origin + content_point * scale` and the viewport shows the region
/// starting at `offset`.
pub struct ViewportController {
    viewport_size: Size,
    observed_viewport_size: Size,
    content: Option<AttachedContent>,
    zoom: ZoomController,
    offset: Point,
    content_origin: Point,
    transition: Option<ZoomTransition>,
    delegate: Option<Weak<dyn ScrollZoomDelegate>>,
    content_to_view: Affine,
    view_to_content: Affine,
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("viewport_size", &self.viewport_size)
            .field("content", &self.content)
            .field("zoom", &self.zoom)
            .field("offset", &self.offset)
            .field("content_origin", &self.content_origin)
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}

impl ViewportController {
    /// Creates an unattached controller for a viewport of `viewport_size` with the default policy.
    #[must_use]
    pub fn new(viewport_size: Size) -> Self {
        Self::with_policy(viewport_size, ZoomPolicy::default())
    }

    /// Creates an unattached controller with an explicit [`ZoomPolicy`].
    #[must_use]
    pub fn with_policy(viewport_size: Size, policy: ZoomPolicy) -> Self {
        let mut vc = Self {
            viewport_size,
            observed_viewport_size: viewport_size,
            content: None,
            zoom: ZoomController::new(policy),
            offset: Point::ZERO,
            content_origin: Point::ZERO,
            transition: None,
            delegate: None,
            content_to_view: Affine::IDENTITY,
            view_to_content: Affine::IDENTITY,
        };
        vc.rebuild_transforms();
        vc
    }

    /// Registers the scroll/zoom delegate.
    ///
    /// The delegate is held weakly; once it is dropped, notifications are skipped.
    pub fn set_delegate(&mut self, delegate: Weak<dyn ScrollZoomDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Removes the scroll/zoom delegate.
    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Displays a new image, replacing any previous one.
    ///
    /// The previous surface is detached first. Zoom bounds are derived from
    /// the current viewport size and the source's extent and level count; the
    /// scale starts at the minimum with no animation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TiledViewError::InvalidGeometry`] if the viewport or
    /// the image has a degenerate size, or
    /// [`crate::TiledViewError::InvalidMaxScale`] if the [`ZoomPolicy`] maps
    /// the source's level count to an unusable maximum scale. The previous
    /// content stays attached in either case and `surface` is dropped without
    /// being attached.
    pub fn attach<S, C>(&mut self, source: &S, surface: C) -> Result<()>
    where
        S: TiledImageSource + ?Sized,
        C: ContentSurface + 'static,
    {
        let size = source.image_size();
        let zoom_levels = source.zoom_levels();
        let bounds =
            compute_zoom_bounds_with(self.viewport_size, size, zoom_levels, self.zoom.policy())?;

        self.detach_surface();
        self.content = Some(AttachedContent {
            size,
            zoom_levels,
            surface: Box::new(surface),
        });
        self.observed_viewport_size = self.viewport_size;
        self.transition = None;
        self.zoom.reset(bounds);
        self.offset = Point::ZERO;
        self.reposition();
        debug!(
            ?size,
            zoom_levels,
            min_scale = bounds.min,
            max_scale = bounds.max,
            "attached tiled image"
        );
        self.notify_scroll_or_zoom();
        Ok(())
    }

    /// Detaches the current image, returning to the unattached state.
    pub fn detach_content(&mut self) {
        if self.detach_surface() {
            self.transition = None;
            self.zoom.reset(ZoomBounds::UNIT);
            self.offset = Point::ZERO;
            self.content_origin = Point::ZERO;
            self.rebuild_transforms();
            debug!("detached tiled image");
        }
    }

    /// Records a new viewport size and re-derives layout.
    pub fn on_viewport_resized(&mut self, size: Size) {
        self.viewport_size = size;
        self.on_viewport_size_or_content_size_changed();
    }

    /// Notes that the content container changed size and re-centers.
    pub fn on_content_resized(&mut self) {
        self.on_viewport_size_or_content_size_changed();
    }

    /// Re-checks layout after the viewport or content size changed.
    ///
    /// Zoom bounds are recomputed only when the viewport size differs from the
    /// last one observed; a content-only change just re-centers. Whenever
    /// bounds are recomputed the offset is clamped to the new scrollable
    /// range. The delegate is notified if the scale was forced or the offset
    /// moved.
    pub fn on_viewport_size_or_content_size_changed(&mut self) {
        let Some(content) = &self.content else {
            trace!("layout change ignored, no content attached");
            return;
        };

        let mut rederived = false;
        let mut forced = false;
        if self.viewport_size != self.observed_viewport_size {
            match compute_zoom_bounds_with(
                self.viewport_size,
                content.size,
                content.zoom_levels,
                self.zoom.policy(),
            ) {
                Ok(bounds) => {
                    self.observed_viewport_size = self.viewport_size;
                    rederived = true;
                    forced = self.zoom.set_bounds(bounds);
                    debug!(
                        viewport = ?self.viewport_size,
                        min_scale = bounds.min,
                        max_scale = bounds.max,
                        forced,
                        "recomputed zoom bounds"
                    );
                }
                Err(err) => {
                    warn!(%err, "keeping previous zoom bounds");
                }
            }
        }

        self.reposition();
        if rederived {
            let clamped = self.clamp_offset(self.offset, self.zoom.scale());
            let moved = clamped != self.offset;
            self.offset = clamped;
            if moved || forced {
                self.rebuild_transforms();
                self.notify_scroll_or_zoom();
            }
        }
    }

    /// Handles a double tap at `anchor`, given in content-local coordinates.
    ///
    /// Returns the request that was applied, or `None` when no content is attached.
    pub fn handle_double_tap(&mut self, anchor: Point) -> Option<ZoomRequest> {
        if self.content.is_none() {
            trace!("double tap ignored, no content attached");
            return None;
        }
        let request = self.zoom.on_double_tap(anchor, self.viewport_size);
        self.apply_zoom_request(request);
        Some(request)
    }

    /// Handles a two-finger tap.
    ///
    /// Returns the request that was applied, or `None` when no content is attached.
    pub fn handle_two_finger_tap(&mut self) -> Option<ZoomRequest> {
        if self.content.is_none() {
            trace!("two-finger tap ignored, no content attached");
            return None;
        }
        let request = self.zoom.on_two_finger_tap();
        self.apply_zoom_request(request);
        Some(request)
    }

    /// Dispatches a recognized gesture whose position is in viewport coordinates.
    pub fn handle_tap_gesture(&mut self, gesture: TapGesture) -> Option<ZoomRequest> {
        match gesture {
            TapGesture::DoubleTap { position } => {
                let anchor = self.view_to_content_point(position);
                self.handle_double_tap(anchor)
            }
            TapGesture::TwoFingerTap => self.handle_two_finger_tap(),
        }
    }

    /// Applies a zoom request against the bounds in effect right now.
    ///
    /// The target scale is re-clamped here rather than when the request was
    /// made. Any in-flight transition is replaced.
    pub fn apply_zoom_request(&mut self, request: ZoomRequest) {
        if self.content.is_none() {
            return;
        }
        let scale = self.zoom.bounds().clamp(request.target_scale);
        let offset = self.offset_for_anchor(request.anchor, scale);
        debug!(
            from = self.zoom.scale(),
            to = scale,
            animated = request.animated,
            "applying zoom request"
        );

        if request.animated {
            self.transition = Some(ZoomTransition::new(
                (self.zoom.scale(), self.offset),
                (scale, offset),
                self.zoom.policy().animation_duration,
            ));
        } else {
            self.transition = None;
            self.set_scale_and_offset(scale, offset);
        }
    }

    /// Steps the in-flight zoom transition by `dt`.
    ///
    /// Returns `true` while the transition is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(mut transition) = self.transition.take() else {
            return false;
        };
        let sample = transition.advance(dt);
        let running = !sample.finished;
        if running {
            self.transition = Some(transition);
        }
        let scale = self.zoom.bounds().clamp(sample.scale);
        let offset = self.clamp_offset(sample.offset, scale);
        self.set_scale_and_offset(scale, offset);
        running
    }

    /// Records a scroll offset produced by the host (drag or inertial scrolling).
    pub fn on_host_scroll(&mut self, offset: Point) {
        self.transition = None;
        self.offset = offset;
        self.rebuild_transforms();
        self.notify_scroll_or_zoom();
    }

    /// Records a zoom scale produced by the host (pinch), clamped into bounds.
    pub fn on_host_zoom(&mut self, scale: f64) {
        self.transition = None;
        self.zoom.set_scale(scale);
        self.reposition();
        self.notify_scroll_or_zoom();
    }

    /// Pans to a fractional position in `[0, 1] x [0, 1]`.
    ///
    /// The fraction is measured against [`Self::max_content_offset`]; values
    /// outside the unit square are clamped.
    pub fn update_offset(&mut self, fraction: Point) {
        let Some(content) = &self.content else {
            return;
        };
        self.transition = None;
        self.offset = offset_for_fraction(fraction, content.size, self.zoom.bounds().max);
        self.rebuild_transforms();
        self.notify_scroll_or_zoom();
    }

    /// Forwards a scroll/zoom tick to the delegate, if it is still alive.
    pub fn notify_scroll_or_zoom(&self) {
        let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        trace!(scale = self.zoom.scale(), offset = ?self.offset, "scroll or zoom");
        delegate.on_scroll_or_zoom(self);
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Unscaled size of the attached image.
    #[must_use]
    pub fn content_size(&self) -> Option<Size> {
        self.content.as_ref().map(|c| c.size)
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.zoom.scale()
    }

    /// Current legal scale range.
    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        self.zoom.bounds()
    }

    /// The zoom controller, for read-only inspection.
    #[must_use]
    pub fn zoom_controller(&self) -> &ZoomController {
        &self.zoom
    }

    /// Current scroll offset.
    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Where the content's top-left corner sits in scroll-content space.
    ///
    /// Non-zero only on axes where the scaled content is smaller than the viewport.
    #[must_use]
    pub fn content_origin(&self) -> Point {
        self.content_origin
    }

    /// The viewport bounds expressed in content-local (unscaled) coordinates.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        let view = Rect::from_origin_size(Point::ZERO, self.viewport_size);
        self.view_to_content.transform_rect_bbox(view)
    }

    /// Scroll offset corresponding to fractional position `(1, 1)` at the maximum scale.
    ///
    /// Zero when no content is attached.
    #[must_use]
    pub fn max_content_offset(&self) -> Point {
        self.content
            .as_ref()
            .map_or(Point::ZERO, |c| max_offset(c.size, self.zoom.bounds().max))
    }

    /// Coarse zoom state.
    #[must_use]
    pub fn zoom_state(&self) -> ZoomState {
        if self.content.is_none() {
            ZoomState::Unattached
        } else {
            self.zoom.state()
        }
    }

    /// Returns `true` if an image is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.content.is_some()
    }

    /// Returns `true` while an animated zoom is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Converts a viewport point into content-local coordinates.
    #[must_use]
    pub fn view_to_content_point(&self, pt: Point) -> Point {
        self.view_to_content * pt
    }

    /// Converts a content-local point into viewport coordinates.
    #[must_use]
    pub fn content_to_view_point(&self, pt: Point) -> Point {
        self.content_to_view * pt
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            viewport_size: self.viewport_size,
            content_size: self.content_size(),
            scale: self.zoom.scale(),
            bounds: self.zoom.bounds(),
            offset: self.offset,
            content_origin: self.content_origin,
            visible_rect: self.visible_rect(),
            state: self.zoom_state(),
            animating: self.is_animating(),
        }
    }

    fn detach_surface(&mut self) -> bool {
        match self.content.take() {
            Some(mut old) => {
                old.surface.detach();
                true
            }
            None => false,
        }
    }

    fn set_scale_and_offset(&mut self, scale: f64, offset: Point) {
        self.zoom.set_scale(scale);
        self.offset = offset;
        self.reposition();
        self.notify_scroll_or_zoom();
    }

    /// Re-centers undersized content for the current scale and rebuilds transforms.
    fn reposition(&mut self) {
        if let Some(content) = &mut self.content {
            let scaled = content.size * self.zoom.scale();
            self.content_origin = compute_centering_offset(self.viewport_size, scaled);
            content.surface.set_origin(self.content_origin);
        }
        self.rebuild_transforms();
    }

    fn offset_for_anchor(&self, anchor: ZoomAnchor, scale: f64) -> Point {
        let Some(content) = &self.content else {
            return Point::ZERO;
        };
        let focus = match anchor {
            ZoomAnchor::ViewportCenter => {
                let center = (self.viewport_size / 2.0).to_vec2().to_point();
                self.view_to_content_point(center)
            }
            ZoomAnchor::Rect(rect) => rect.center(),
        };
        let origin = compute_centering_offset(self.viewport_size, content.size * scale);
        let desired = Point::new(
            origin.x + focus.x * scale - self.viewport_size.width / 2.0,
            origin.y + focus.y * scale - self.viewport_size.height / 2.0,
        );
        self.clamp_offset(desired, scale)
    }

    /// Clamps `offset` to the scrollable range of the content at `scale`.
    fn clamp_offset(&self, offset: Point, scale: f64) -> Point {
        let Some(content) = &self.content else {
            return offset;
        };
        let axis = |v: f64, content: f64, view: f64| {
            let max = (content * scale - view).max(0.0);
            if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
        };
        Point::new(
            axis(offset.x, content.size.width, self.viewport_size.width),
            axis(offset.y, content.size.height, self.viewport_size.height),
        )
    }

    fn rebuild_transforms(&mut self) {
        // Content -> view: scale, shift into scroll-content space by the
        // centering origin, then scroll by the offset.
        let translation = self.content_origin.to_vec2() - self.offset.to_vec2();
        self.content_to_view = Affine::translate(translation) * Affine::scale(self.zoom.scale());
        self.view_to_content = self.content_to_view.inverse();
    }
}

/// Debug snapshot of a [`ViewportController`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Current viewport size.
    pub viewport_size: Size,
    /// Unscaled size of the attached image, if any.
    pub content_size: Option<Size>,
    /// Current zoom scale.
    pub scale: f64,
    /// Current legal scale range.
    pub bounds: ZoomBounds,
    /// Current scroll offset.
    pub offset: Point,
    /// Centering origin of the content in scroll-content space.
    pub content_origin: Point,
    /// Viewport bounds in content-local coordinates.
    pub visible_rect: Rect,
    /// Coarse zoom state.
    pub state: ZoomState,
    /// Whether an animated zoom is in flight.
    pub animating: bool,
}
