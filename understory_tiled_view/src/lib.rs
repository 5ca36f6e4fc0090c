// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tiled_view --heading-base-level=0

//! Understory Tiled View: pan/zoom control for very large tiled images.
//!
//! This crate provides the headless controller behind a tiled-image viewer: a
//! huge image, rendered elsewhere as a grid of tiles, shown through a
//! fixed-size viewport. It focuses on:
//! - Legal zoom ranges for an image/viewport pair ([`compute_zoom_bounds`]).
//! - Tap-to-zoom decisions: double tap steps in toward the tapped point,
//!   two-finger tap steps out ([`ZoomController`]).
//! - Keeping undersized content centered as the viewport or content resizes
//!   ([`ViewportController`]).
//! - Mapping a scale-independent fractional position onto a scroll offset
//!   ([`offset_for_fraction`]), for minimaps and overviews.
//! - Classifying raw touches into those gestures ([`TapRecognizer`]).
//!
//! It does **not** decode, cache, or draw tiles, and it does not implement
//! scroll physics. Hosts are expected to:
//! - Provide a [`TiledImageSource`] and a [`ContentSurface`] that renders it.
//! - Call [`ViewportController::on_viewport_resized`] /
//!   [`ViewportController::on_content_resized`] from their layout pass.
//! - Report their own drag/pinch results with
//!   [`ViewportController::on_host_scroll`] and
//!   [`ViewportController::on_host_zoom`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_tiled_view::{ContentSurface, TiledImageSource, ViewportController};
//!
//! struct Map;
//! impl TiledImageSource for Map {
//!     fn image_size(&self) -> Size { Size::new(1000.0, 500.0) }
//!     fn zoom_levels(&self) -> u32 { 5 }
//! }
//!
//! struct Tiles;
//! impl ContentSurface for Tiles {
//!     fn set_origin(&mut self, _origin: Point) {}
//!     fn detach(&mut self) {}
//! }
//!
//! let mut view = ViewportController::new(Size::new(300.0, 300.0));
//! view.attach(&Map, Tiles).unwrap();
//! assert!((view.scale() - 0.3).abs() < 1e-9);
//!
//! // Double tap in the middle of the image: zoom in one step toward it.
//! view.handle_double_tap(Point::new(500.0, 250.0));
//! assert!((view.scale() - 0.6).abs() < 1e-9);
//!
//! // Drive the pan position from a minimap.
//! view.update_offset(Point::new(0.5, 0.5));
//! assert_eq!(view.offset(), Point::new(1500.0, 750.0));
//! ```
//!
//! ## Design notes
//!
//! - The controller is single-threaded and event-driven. Every entry point
//!   completes synchronously; animated zooms are advanced explicitly with
//!   [`ViewportController::advance`], and a newer request always replaces an
//!   in-flight one.
//! - Zoom requests are re-clamped when applied, so a resize arriving between
//!   a gesture and its application never leaves the scale out of bounds.
//! - The delegate is held weakly and the data source is only borrowed during
//!   [`ViewportController::attach`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod error;
mod geometry;
mod gesture;
mod mapper;
mod policy;
mod transition;
mod zoom;

pub use controller::{
    ContentSurface, ScrollZoomDelegate, TiledImageSource, ViewportController, ViewportDebugInfo,
};
pub use error::{GeometryKind, Result, TiledViewError};
pub use geometry::{
    ZoomBounds, compute_centering_offset, compute_zoom_bounds, compute_zoom_bounds_with,
    rect_around,
};
pub use gesture::{TapGesture, TapRecognizer, TouchEvent, TouchPhase};
pub use mapper::{clamp_fraction, max_offset, offset_for_fraction};
pub use policy::{TapPolicy, ZoomPolicy};
pub use transition::{TransitionSample, ZoomTransition};
pub use zoom::{ZoomAnchor, ZoomController, ZoomRequest, ZoomState};
