// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased interpolation for animated zooms.

use core::time::Duration;

use kurbo::Point;

/// An in-flight animated zoom from one scale/offset pair to another.
///
/// The transition only interpolates; the owner re-clamps every sample against
/// its current bounds. Starting a new transition replaces the old one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransition {
    from_scale: f64,
    to_scale: f64,
    from_offset: Point,
    to_offset: Point,
    elapsed: Duration,
    duration: Duration,
}

/// One interpolated step of a [`ZoomTransition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSample {
    /// Interpolated zoom scale.
    pub scale: f64,
    /// Interpolated scroll offset.
    pub offset: Point,
    /// `true` once the transition reached its target.
    pub finished: bool,
}

impl ZoomTransition {
    /// Creates a transition starting at `from` and ending at `to`, each a `(scale, offset)` pair.
    #[must_use]
    pub fn new(from: (f64, Point), to: (f64, Point), duration: Duration) -> Self {
        Self {
            from_scale: from.0,
            to_scale: to.0,
            from_offset: from.1,
            to_offset: to.1,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Target scale.
    #[must_use]
    pub fn target_scale(&self) -> f64 {
        self.to_scale
    }

    /// Target scroll offset.
    #[must_use]
    pub fn target_offset(&self) -> Point {
        self.to_offset
    }

    /// Advances by `dt` and returns the sample for the new time.
    pub fn advance(&mut self, dt: Duration) -> TransitionSample {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        let finished = t >= 1.0;
        if finished {
            return TransitionSample {
                scale: self.to_scale,
                offset: self.to_offset,
                finished,
            };
        }
        let e = ease_out_cubic(t);
        TransitionSample {
            scale: self.from_scale + (self.to_scale - self.from_scale) * e,
            offset: self.from_offset.lerp(self.to_offset, e),
            finished,
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}
