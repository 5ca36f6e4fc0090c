// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between fractional pan positions and absolute scroll offsets.
//!
//! The reference frame is the image at its **maximum** zoom scale, so a
//! fraction means the same thing no matter how far the user is currently
//! zoomed in. A minimap or thumbnail overview can therefore drive the pan
//! position without knowing the current scale.

use kurbo::{Point, Size};

/// Scroll offset that corresponds to fractional position `(1, 1)`.
#[must_use]
pub fn max_offset(content: Size, max_scale: f64) -> Point {
    Point::new(content.width * max_scale, content.height * max_scale)
}

/// Scroll offset for a fractional position.
///
/// Fractions outside `[0, 1]` are clamped; a NaN component is treated as `0`.
///
/// ```rust
/// use kurbo::{Point, Size};
/// use understory_tiled_view::offset_for_fraction;
///
/// let offset = offset_for_fraction(Point::new(0.5, 0.5), Size::new(1000.0, 500.0), 3.0);
/// assert_eq!(offset, Point::new(1500.0, 750.0));
/// ```
#[must_use]
pub fn offset_for_fraction(fraction: Point, content: Size, max_scale: f64) -> Point {
    let fraction = clamp_fraction(fraction);
    let max = max_offset(content, max_scale);
    Point::new(fraction.x * max.x, fraction.y * max.y)
}

/// Clamps both components of `fraction` into `[0, 1]`.
#[must_use]
pub fn clamp_fraction(fraction: Point) -> Point {
    let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Point::new(unit(fraction.x), unit(fraction.y))
}
