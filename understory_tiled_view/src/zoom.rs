// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom scale ownership and tap-to-zoom decisions.
//!
//! [`ZoomController`] holds the current scale and its legal [`ZoomBounds`].
//! Gesture handlers only *decide*: they return a [`ZoomRequest`] and leave
//! applying it (offsets, centering, animation) to the owning
//! [`crate::ViewportController`].

use kurbo::{Point, Rect, Size};

use crate::geometry::{ZoomBounds, rect_around};
use crate::policy::ZoomPolicy;

/// Where a zoom request should keep the content steady.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAnchor {
    /// Keep the content point under the viewport center in place.
    ViewportCenter,
    /// Bring this content-space rectangle into view; its center becomes the
    /// viewport center, subject to clamping against the content edges.
    Rect(Rect),
}

/// A transient zoom decision produced by gesture handling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomRequest {
    /// Scale to zoom to. Re-clamped against the bounds current at application time.
    pub target_scale: f64,
    /// What the transition should keep in view.
    pub anchor: ZoomAnchor,
    /// Whether the owner should animate toward the target.
    pub animated: bool,
}

/// Coarse zoom state of a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomState {
    /// No content is attached.
    Unattached,
    /// At the minimum scale; the image fits the viewport.
    ZoomedOut,
    /// Strictly between the minimum and maximum scale.
    ZoomedIn,
    /// At the maximum scale.
    ZoomedMax,
}

/// Owner of the current zoom scale and its bounds.
#[derive(Clone, Debug)]
pub struct ZoomController {
    scale: f64,
    bounds: ZoomBounds,
    policy: ZoomPolicy,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomPolicy::default())
    }
}

impl ZoomController {
    /// Creates a controller at scale `1.0` with [`ZoomBounds::UNIT`].
    #[must_use]
    pub fn new(policy: ZoomPolicy) -> Self {
        Self {
            scale: 1.0,
            bounds: ZoomBounds::UNIT,
            policy,
        }
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current legal scale range.
    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Zoom policy in effect.
    #[must_use]
    pub fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    /// Replaces the bounds and jumps to the new minimum scale.
    pub fn reset(&mut self, bounds: ZoomBounds) {
        self.bounds = bounds;
        self.scale = bounds.min;
    }

    /// Replaces the bounds, clamping the current scale into them.
    ///
    /// Returns `true` if the scale had to change, in which case the owner must
    /// reposition its content.
    #[must_use = "a clamped scale requires the content to be repositioned"]
    pub fn set_bounds(&mut self, bounds: ZoomBounds) -> bool {
        self.bounds = bounds;
        let clamped = bounds.clamp(self.scale);
        let changed = clamped != self.scale;
        self.scale = clamped;
        changed
    }

    /// Sets the scale, clamped into the current bounds.
    ///
    /// Returns `true` if the stored scale changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        let clamped = self.bounds.clamp(scale);
        let changed = clamped != self.scale;
        self.scale = clamped;
        changed
    }

    /// Returns `true` if the scale sits at the minimum, within the policy tolerance.
    #[must_use]
    pub fn is_at_min(&self) -> bool {
        self.policy.scales_match(self.scale, self.bounds.min)
    }

    /// Returns `true` if the scale sits at (or above) the maximum, within the policy tolerance.
    #[must_use]
    pub fn is_at_max(&self) -> bool {
        self.scale >= self.bounds.max || self.policy.scales_match(self.scale, self.bounds.max)
    }

    /// Classifies the current scale.
    #[must_use]
    pub fn state(&self) -> ZoomState {
        if self.is_at_min() {
            ZoomState::ZoomedOut
        } else if self.is_at_max() {
            ZoomState::ZoomedMax
        } else {
            ZoomState::ZoomedIn
        }
    }

    /// Decides the response to a double tap at `anchor` (content coordinates).
    ///
    /// At the maximum scale this resets to the minimum around the viewport
    /// center; repeated taps there keep producing the same reset. Otherwise it
    /// zooms in by one step, capped at the maximum, toward a rectangle centered
    /// on the tapped point.
    #[must_use]
    pub fn on_double_tap(&self, anchor: Point, viewport: Size) -> ZoomRequest {
        let animated = self.policy.animate_double_tap;
        if self.is_at_max() {
            return ZoomRequest {
                target_scale: self.bounds.min,
                anchor: ZoomAnchor::ViewportCenter,
                animated,
            };
        }
        let target_scale = (self.scale * self.policy.zoom_step).min(self.bounds.max);
        ZoomRequest {
            target_scale,
            anchor: ZoomAnchor::Rect(rect_around(anchor, viewport, target_scale)),
            animated,
        }
    }

    /// Decides the response to a two-finger tap.
    ///
    /// At the minimum scale this toggles to the maximum. Otherwise it zooms
    /// out by one step, never going below the minimum. Both keep the viewport
    /// center steady.
    #[must_use]
    pub fn on_two_finger_tap(&self) -> ZoomRequest {
        let target_scale = if self.is_at_min() {
            self.bounds.max
        } else {
            (self.scale / self.policy.zoom_step).max(self.bounds.min)
        };
        ZoomRequest {
            target_scale,
            anchor: ZoomAnchor::ViewportCenter,
            animated: self.policy.animate_two_finger_tap,
        }
    }
}
