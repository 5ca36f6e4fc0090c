// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced while configuring a tiled view.

use kurbo::Size;

/// Which extent failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    /// The fixed-size window the image is shown through.
    Viewport,
    /// The unscaled image dimensions reported by the data source.
    Content,
}

/// Errors produced by [`crate::ViewportController::attach`] and
/// [`crate::compute_zoom_bounds_with`].
///
/// Everything past configuration is total: gesture and scroll inputs are
/// clamped instead of rejected.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TiledViewError {
    /// A viewport or content extent had a zero, negative, or non-finite dimension.
    #[error("invalid {kind:?} geometry: {width}x{height}")]
    InvalidGeometry {
        /// Which extent was rejected.
        kind: GeometryKind,
        /// Rejected width.
        width: f64,
        /// Rejected height.
        height: f64,
    },
    /// The [`crate::ZoomPolicy`] maps the zoom levels to a maximum scale that
    /// is zero, negative, or non-finite.
    #[error("zoom policy yields invalid maximum scale {max_scale} for {zoom_levels} levels")]
    InvalidMaxScale {
        /// Rejected maximum scale.
        max_scale: f64,
        /// Zoom-levels hint it was derived from.
        zoom_levels: u32,
    },
}

/// Result alias used throughout this crate.
pub type Result<T, E = TiledViewError> = core::result::Result<T, E>;

/// Checks that both dimensions of `size` are finite and strictly positive.
pub(crate) fn validate_size(kind: GeometryKind, size: Size) -> Result<Size> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(size.width) && ok(size.height) {
        Ok(size)
    } else {
        Err(TiledViewError::InvalidGeometry {
            kind,
            width: size.width,
            height: size.height,
        })
    }
}
