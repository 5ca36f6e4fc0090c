// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap classification: turn raw touch events into zoom gestures.
//!
//! [`TapRecognizer`] is a pure state machine. It does not own the viewport and
//! has no side effects; the host feeds it [`TouchEvent`]s and forwards any
//! recognized [`TapGesture`] to
//! [`ViewportController::handle_tap_gesture`](crate::ViewportController::handle_tap_gesture).
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Point;
//! use understory_tiled_view::{TapGesture, TapRecognizer, TouchEvent, TouchPhase};
//!
//! let mut taps = TapRecognizer::default();
//! let at = Point::new(40.0, 60.0);
//! let ms = Duration::from_millis;
//!
//! assert_eq!(taps.handle(TouchEvent::new(1, TouchPhase::Down, at, ms(0))), None);
//! assert_eq!(taps.handle(TouchEvent::new(1, TouchPhase::Up, at, ms(80))), None);
//! assert_eq!(taps.handle(TouchEvent::new(1, TouchPhase::Down, at, ms(160))), None);
//! assert_eq!(
//!     taps.handle(TouchEvent::new(1, TouchPhase::Up, at, ms(220))),
//!     Some(TapGesture::DoubleTap { position: at })
//! );
//! ```

use core::time::Duration;

use kurbo::Point;
use smallvec::SmallVec;

use crate::policy::TapPolicy;

/// Phase of a single touch point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// A finger touched the surface.
    Down,
    /// A finger moved while touching.
    Move,
    /// A finger lifted.
    Up,
    /// The host abandoned the touch (for example, it became a system gesture).
    Cancel,
}

/// A raw touch event in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Host identifier of the finger; stable from `Down` to `Up`.
    pub id: u64,
    /// What happened.
    pub phase: TouchPhase,
    /// Position in viewport coordinates.
    pub position: Point,
    /// Monotonic timestamp.
    pub time: Duration,
}

impl TouchEvent {
    /// Creates a touch event.
    #[must_use]
    pub fn new(id: u64, phase: TouchPhase, position: Point, time: Duration) -> Self {
        Self {
            id,
            phase,
            position,
            time,
        }
    }
}

/// A recognized zoom gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapGesture {
    /// Two quick single-finger taps, reported at the second tap in viewport coordinates.
    DoubleTap {
        /// Viewport-space position of the second tap.
        position: Point,
    },
    /// Two fingers touched and lifted together.
    TwoFingerTap,
}

#[derive(Clone, Copy, Debug)]
struct ActiveTouch {
    id: u64,
    start: Point,
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    end_time: Duration,
}

/// Classifies touch sequences into [`TapGesture`]s.
///
/// A *sequence* runs from the first finger down until every finger is up.
/// A sequence is abandoned if a third distinct finger touches down (even after
/// an earlier one lifted), any finger moves farther than
/// [`TapPolicy::tap_slop`], it lasts longer than
/// [`TapPolicy::max_tap_duration`], or a touch is cancelled.
#[derive(Clone, Debug, Default)]
pub struct TapRecognizer {
    policy: TapPolicy,
    touches: SmallVec<[ActiveTouch; 2]>,
    /// Distinct fingers that touched down during the current sequence.
    fingers: usize,
    abandoned: bool,
    sequence_start: Duration,
    pending: Option<PendingTap>,
}

impl TapRecognizer {
    /// Creates a recognizer with the given thresholds.
    #[must_use]
    pub fn new(policy: TapPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Thresholds in effect.
    #[must_use]
    pub fn policy(&self) -> &TapPolicy {
        &self.policy
    }

    /// Returns `true` while at least one finger is down.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.touches.is_empty()
    }

    /// Forgets all in-progress touches and any half-finished double tap.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.fingers = 0;
        self.abandoned = false;
        self.pending = None;
    }

    /// Feeds one touch event, returning a gesture if this event completed one.
    pub fn handle(&mut self, event: TouchEvent) -> Option<TapGesture> {
        match event.phase {
            TouchPhase::Down => {
                self.touch_down(event);
                None
            }
            TouchPhase::Move => {
                self.check_slop(event.id, event.position);
                None
            }
            TouchPhase::Up => self.touch_up(event),
            TouchPhase::Cancel => {
                self.reset();
                None
            }
        }
    }

    fn touch_down(&mut self, event: TouchEvent) {
        if self.touches.is_empty() {
            self.fingers = 0;
            self.abandoned = false;
            self.sequence_start = event.time;
        }
        if self.touches.iter().any(|t| t.id == event.id) {
            return;
        }
        self.touches.push(ActiveTouch {
            id: event.id,
            start: event.position,
        });
        self.fingers += 1;
        if self.fingers > 2 {
            self.abandon();
        }
    }

    fn check_slop(&mut self, id: u64, position: Point) {
        let slop = self.policy.tap_slop;
        let moved = self
            .touches
            .iter()
            .find(|t| t.id == id)
            .is_some_and(|t| (position - t.start).hypot2() > slop * slop);
        if moved {
            self.abandon();
        }
    }

    fn touch_up(&mut self, event: TouchEvent) -> Option<TapGesture> {
        self.check_slop(event.id, event.position);
        let index = self.touches.iter().position(|t| t.id == event.id)?;
        let touch = self.touches.remove(index);

        if event.time.saturating_sub(self.sequence_start) > self.policy.max_tap_duration {
            self.abandon();
        }
        if !self.touches.is_empty() || self.abandoned {
            return None;
        }

        match self.fingers {
            1 => self.complete_single_tap(touch.start, event.time),
            2 => {
                self.pending = None;
                Some(TapGesture::TwoFingerTap)
            }
            _ => None,
        }
    }

    fn complete_single_tap(&mut self, position: Point, end_time: Duration) -> Option<TapGesture> {
        if let Some(first) = self.pending.take() {
            let gap = self.sequence_start.saturating_sub(first.end_time);
            let slop = self.policy.double_tap_slop;
            if gap <= self.policy.double_tap_interval
                && (position - first.position).hypot2() <= slop * slop
            {
                return Some(TapGesture::DoubleTap { position });
            }
        }
        self.pending = Some(PendingTap { position, end_time });
        None
    }

    fn abandon(&mut self) {
        self.abandoned = true;
        self.pending = None;
    }
}
