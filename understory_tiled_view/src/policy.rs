// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable thresholds for zoom stepping and tap recognition.

use core::time::Duration;

/// Tunable zoom behavior for a [`crate::ViewportController`].
///
/// The defaults reproduce the baseline tiled-image behavior: taps zoom by a
/// factor of two, the maximum scale is `max(levels, 3) * 0.6`, and tap zooms
/// are applied without animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomPolicy {
    /// Multiplicative step used by double-tap (zoom in) and two-finger tap (zoom out).
    pub zoom_step: f64,
    /// Maximum scale contributed by each zoom level of the tile source.
    pub max_scale_per_level: f64,
    /// Lower bound applied to the zoom-levels hint before deriving the maximum scale.
    pub min_zoom_levels: u32,
    /// Relative tolerance used when deciding whether a scale sits at a bound.
    pub scale_epsilon: f64,
    /// Whether double-tap zooms animate.
    pub animate_double_tap: bool,
    /// Whether two-finger-tap zooms animate.
    pub animate_two_finger_tap: bool,
    /// Length of an animated zoom transition.
    pub animation_duration: Duration,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            zoom_step: 2.0,
            max_scale_per_level: 0.6,
            min_zoom_levels: 3,
            scale_epsilon: 1e-9,
            animate_double_tap: false,
            animate_two_finger_tap: false,
            animation_duration: Duration::from_millis(250),
        }
    }
}

impl ZoomPolicy {
    /// Returns a copy with the given zoom step.
    ///
    /// Steps at or below `1.0` would never change the scale, so they are
    /// ignored and the current step is kept.
    #[must_use]
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        if step.is_finite() && step > 1.0 {
            self.zoom_step = step;
        }
        self
    }

    /// Returns a copy with animation toggled for both tap gestures.
    #[must_use]
    pub fn with_animation(mut self, animate: bool, duration: Duration) -> Self {
        self.animate_double_tap = animate;
        self.animate_two_finger_tap = animate;
        self.animation_duration = duration;
        self
    }

    /// Maximum zoom scale for a tile source with `zoom_levels` discrete levels.
    #[must_use]
    pub fn max_scale_for_levels(&self, zoom_levels: u32) -> f64 {
        f64::from(zoom_levels.max(self.min_zoom_levels)) * self.max_scale_per_level
    }

    /// Returns `true` if `a` and `b` are equal within [`Self::scale_epsilon`].
    #[must_use]
    pub fn scales_match(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.scale_epsilon * a.abs().max(b.abs()).max(1.0)
    }
}

/// Thresholds used by [`crate::TapRecognizer`] to classify touches as taps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapPolicy {
    /// Longest press still counted as a tap.
    pub max_tap_duration: Duration,
    /// Maximum movement, in viewport units, for a touch to stay a tap.
    pub tap_slop: f64,
    /// Longest gap between the first tap ending and the second beginning.
    pub double_tap_interval: Duration,
    /// Maximum distance between the two taps of a double tap.
    pub double_tap_slop: f64,
}

impl Default for TapPolicy {
    fn default() -> Self {
        Self {
            max_tap_duration: Duration::from_millis(300),
            tap_slop: 10.0,
            double_tap_interval: Duration::from_millis(300),
            double_tap_slop: 40.0,
        }
    }
}
