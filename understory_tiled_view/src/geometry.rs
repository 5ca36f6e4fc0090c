// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless zoom geometry: bounds, centering, and zoom rectangles.

use kurbo::{Point, Rect, Size};

use crate::error::{GeometryKind, Result, TiledViewError, validate_size};
use crate::policy::ZoomPolicy;

/// Inclusive range of legal zoom scales for a viewport/content pair.
///
/// `min <= max` always holds for bounds produced by [`compute_zoom_bounds`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    /// Smallest legal scale; the whole image fits the viewport at this scale
    /// unless that would exceed [`Self::max`].
    pub min: f64,
    /// Largest legal scale.
    pub max: f64,
}

impl ZoomBounds {
    /// Bounds that only admit a scale of `1.0`, used before any content is attached.
    pub const UNIT: Self = Self { min: 1.0, max: 1.0 };

    /// Creates bounds, swapping the arguments if they are out of order.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamps `scale` into `[min, max]`.
    ///
    /// A NaN scale clamps to [`Self::min`].
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            self.min
        } else {
            scale.clamp(self.min, self.max)
        }
    }

    /// Returns `true` if `scale` lies inside the bounds.
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Computes zoom bounds with the default [`ZoomPolicy`].
///
/// - `min` is the scale at which the whole image fits inside the viewport.
/// - `max` is `max(zoom_levels, 3) * 0.6`.
/// - If the fit scale would exceed `max`, `min` is lowered to `max` so the
///   image is never forced beyond the policy maximum just to fill the view.
///
/// ```rust
/// use kurbo::Size;
/// use understory_tiled_view::compute_zoom_bounds;
///
/// let bounds = compute_zoom_bounds(Size::new(300.0, 300.0), Size::new(1000.0, 500.0), 5).unwrap();
/// assert!((bounds.min - 0.3).abs() < 1e-9);
/// assert!((bounds.max - 3.0).abs() < 1e-9);
/// ```
///
/// # Errors
///
/// Returns [`crate::TiledViewError::InvalidGeometry`] if either size has a
/// zero, negative, or non-finite dimension.
pub fn compute_zoom_bounds(viewport: Size, content: Size, zoom_levels: u32) -> Result<ZoomBounds> {
    compute_zoom_bounds_with(viewport, content, zoom_levels, &ZoomPolicy::default())
}

/// Computes zoom bounds using the level-to-scale mapping of `policy`.
///
/// # Errors
///
/// See [`compute_zoom_bounds`]. Additionally returns
/// [`TiledViewError::InvalidMaxScale`] if `policy` maps `zoom_levels` to a
/// maximum scale that is zero, negative, or non-finite.
pub fn compute_zoom_bounds_with(
    viewport: Size,
    content: Size,
    zoom_levels: u32,
    policy: &ZoomPolicy,
) -> Result<ZoomBounds> {
    let viewport = validate_size(GeometryKind::Viewport, viewport)?;
    let content = validate_size(GeometryKind::Content, content)?;

    let x_scale = viewport.width / content.width;
    let y_scale = viewport.height / content.height;
    let max = policy.max_scale_for_levels(zoom_levels);
    if !(max.is_finite() && max > 0.0) {
        return Err(TiledViewError::InvalidMaxScale {
            max_scale: max,
            zoom_levels,
        });
    }
    let min = x_scale.min(y_scale).min(max);
    Ok(ZoomBounds { min, max })
}

/// Offset that centers content of `scaled_content` size inside `viewport`.
///
/// Each axis is `max((viewport - scaled_content) / 2, 0)`: content smaller
/// than the viewport is centered, larger content is pinned at the origin and
/// left to scrolling.
#[must_use]
pub fn compute_centering_offset(viewport: Size, scaled_content: Size) -> Point {
    let x = (-(scaled_content.width - viewport.width) / 2.0).max(0.0);
    let y = (-(scaled_content.height - viewport.height) / 2.0).max(0.0);
    Point::new(x, y)
}

/// Content-space rectangle shown by `viewport` at `scale`, centered on `point`.
///
/// The rectangle is not clamped to the content; callers do that before use.
#[must_use]
pub fn rect_around(point: Point, viewport: Size, scale: f64) -> Rect {
    let size = Size::new(viewport.width / scale, viewport.height / scale);
    Rect::from_center_size(point, size)
}
