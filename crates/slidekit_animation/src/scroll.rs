//! Scroll animator
//!
//! Moves a track's `scroll_left` to a target offset. User-initiated moves
//! (`Source::Click`) animate frame by frame with a sine ease-in-out; every
//! other source, and every move under reduced motion, jumps immediately.
//!
//! While animating, `scroll-snap-type` and `overscroll-behavior` are switched
//! off on the track so native snapping does not fight the programmatic
//! scroll. Both are restored when the animation finishes, overshoots, or is
//! cancelled by a newer call.
//!
//! # Example
//!
//! ```ignore
//! let animator = ScrollAnimator::new(&doc, &scheduler);
//! animator.scroll_to(&mut doc.borrow_mut(), &config, ScrollRequest {
//!     track,
//!     target: 640.0,
//!     source: Source::Click,
//!     duration_ms: 300,
//! });
//! scheduler.advance(400.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slidekit_core::{Config, Document, ElementId, SharedDocument, Source};

use crate::easing::Easing;
use crate::scheduler::{FrameId, Scheduler};

const SNAP: &str = "scroll-snap-type";
const OVERSCROLL: &str = "overscroll-behavior";

/// A single scroll-to call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub track: ElementId,
    pub target: f32,
    pub source: Source,
    pub duration_ms: u32,
}

/// How a scroll-to call was carried out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Offset applied immediately
    Jumped,
    /// Frame loop started
    Animating,
    /// Already at the target
    Unchanged,
}

/// Inline styles overridden for the duration of an animation
#[derive(Clone, Debug)]
struct SavedStyles {
    track: ElementId,
    snap: Option<String>,
    overscroll: Option<String>,
}

#[derive(Default)]
struct AnimatorState {
    frame: Option<FrameId>,
    saved: Option<SavedStyles>,
}

#[derive(Clone, Copy)]
struct Motion {
    track: ElementId,
    from: f32,
    target: f32,
    delta: f32,
    start: f64,
    duration: f32,
}

impl Motion {
    /// Direction-aware: passing the target in the direction of travel
    fn overshoots(&self, value: f32) -> bool {
        if self.delta > 0.0 {
            value >= self.target
        } else {
            value <= self.target
        }
    }
}

/// Animated / immediate scroll-to with a single cancellable frame handle
pub struct ScrollAnimator {
    doc: SharedDocument,
    scheduler: Scheduler,
    easing: Easing,
    state: Rc<RefCell<AnimatorState>>,
}

impl ScrollAnimator {
    pub fn new(doc: &SharedDocument, scheduler: &Scheduler) -> Self {
        Self {
            doc: Rc::clone(doc),
            scheduler: scheduler.clone(),
            easing: Easing::EaseInOutSine,
            state: Rc::new(RefCell::new(AnimatorState::default())),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().frame.is_some()
    }

    /// Scroll `request.track` to `request.target`
    ///
    /// `doc` must be the document this animator was created for; it is passed
    /// in because callers already hold its borrow.
    pub fn scroll_to(
        &self,
        doc: &mut Document,
        config: &Config,
        request: ScrollRequest,
    ) -> ScrollOutcome {
        self.cancel(doc);

        if config.reduce_motion || !request.source.is_user() || request.duration_ms == 0 {
            doc.set_scroll_left(request.track, request.target);
            return ScrollOutcome::Jumped;
        }

        let from = doc.scroll_left(request.track);
        let target = request
            .target
            .clamp(0.0, doc.max_scroll_left(request.track));
        let delta = target - from;
        if delta.abs() < f32::EPSILON {
            return ScrollOutcome::Unchanged;
        }

        let saved = SavedStyles {
            track: request.track,
            snap: doc.style(request.track, SNAP).map(str::to_string),
            overscroll: doc.style(request.track, OVERSCROLL).map(str::to_string),
        };
        doc.set_style(request.track, SNAP, "none");
        doc.set_style(request.track, OVERSCROLL, "none");
        self.state.borrow_mut().saved = Some(saved);

        tracing::trace!(from, to = target, duration = request.duration_ms, "scroll animation start");

        let motion = Motion {
            track: request.track,
            from,
            target,
            delta,
            start: self.scheduler.now(),
            duration: request.duration_ms as f32,
        };
        schedule_step(
            self.scheduler.clone(),
            Rc::clone(&self.doc),
            Rc::clone(&self.state),
            self.easing,
            motion,
        );
        ScrollOutcome::Animating
    }

    /// Stop the in-flight animation (if any) and restore the track styles
    pub fn cancel(&self, doc: &mut Document) {
        let mut state = self.state.borrow_mut();
        if let Some(frame) = state.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        restore(doc, &mut state);
    }
}

impl Drop for ScrollAnimator {
    fn drop(&mut self) {
        let frame = self.state.borrow_mut().frame.take();
        if let Some(frame) = frame {
            self.scheduler.cancel_frame(frame);
        }
        if let Ok(mut doc) = self.doc.try_borrow_mut() {
            restore(&mut doc, &mut self.state.borrow_mut());
        }
    }
}

fn restore(doc: &mut Document, state: &mut AnimatorState) {
    let Some(saved) = state.saved.take() else {
        return;
    };
    match saved.snap {
        Some(value) => doc.set_style(saved.track, SNAP, value),
        None => doc.remove_style(saved.track, SNAP),
    }
    match saved.overscroll {
        Some(value) => doc.set_style(saved.track, OVERSCROLL, value),
        None => doc.remove_style(saved.track, OVERSCROLL),
    }
}

fn schedule_step(
    scheduler: Scheduler,
    doc: SharedDocument,
    state: Rc<RefCell<AnimatorState>>,
    easing: Easing,
    motion: Motion,
) {
    let next = scheduler.clone();
    let step_state = Rc::clone(&state);
    let frame = scheduler.request_frame(move |now| {
        let elapsed = (now - motion.start) as f32;
        let value = easing.value_at(elapsed, motion.from, motion.delta, motion.duration);
        let finished = elapsed >= motion.duration || motion.overshoots(value);
        {
            let mut doc = doc.borrow_mut();
            if finished {
                doc.set_scroll_left(motion.track, motion.target);
                let mut state = step_state.borrow_mut();
                state.frame = None;
                restore(&mut doc, &mut state);
                tracing::trace!(to = motion.target, "scroll animation done");
                return;
            }
            doc.set_scroll_left(motion.track, value);
        }
        schedule_step(next, doc, step_state, easing, motion);
    });
    state.borrow_mut().frame = Some(frame);
}
