//! Cooperative scheduler
//!
//! A single-threaded virtual clock standing in for the browser's timer and
//! animation-frame queues. Components schedule work through a cloneable
//! [`Scheduler`] handle; the host drives time with [`Scheduler::advance`].
//!
//! Callbacks run with no scheduler borrow held, so they may schedule or
//! cancel further work. Timers fire in due order (ties in scheduling order);
//! frame callbacks are batched and fire once per frame interval.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use slidekit_animation::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let fired = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&fired);
//! scheduler.set_timeout(100, move || flag.set(true));
//!
//! scheduler.advance(99.0);
//! assert!(!fired.get());
//! scheduler.advance(1.0);
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending timeout
    pub struct TimerId;
    /// Handle to a pending animation-frame callback
    pub struct FrameId;
}

/// Default frame interval (ms)
pub const FRAME_INTERVAL_MS: f64 = 16.0;

type TimerCallback = Box<dyn FnOnce()>;
type FrameCallback = Box<dyn FnOnce(f64)>;

struct Timer {
    due: f64,
    seq: u64,
    callback: TimerCallback,
}

struct Frame {
    seq: u64,
    callback: FrameCallback,
}

struct SchedulerInner {
    now: f64,
    seq: u64,
    timers: SlotMap<TimerId, Timer>,
    frames: SlotMap<FrameId, Frame>,
    /// When the next frame batch runs (set while frames are pending)
    next_frame_at: Option<f64>,
    frame_interval: f64,
}

impl SchedulerInner {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn earliest_timer(&self) -> Option<(TimerId, f64)> {
        self.timers
            .iter()
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(id, t)| (id, t.due))
    }
}

enum Step {
    Timer(TimerId),
    Frames,
}

/// Cloneable handle to a shared virtual clock
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL_MS)
    }

    pub fn with_frame_interval(interval_ms: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now: 0.0,
                seq: 0,
                timers: SlotMap::with_key(),
                frames: SlotMap::with_key(),
                next_frame_at: None,
                frame_interval: interval_ms.max(1.0),
            })),
        }
    }

    /// Current time in ms since the scheduler was created
    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    /// Run `callback` once after `delay_ms`
    pub fn set_timeout<F>(&self, delay_ms: u32, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq();
        let due = inner.now + f64::from(delay_ms);
        inner.timers.insert(Timer {
            due,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timeout; returns whether it was still pending
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.borrow_mut().timers.remove(id).is_some()
    }

    /// Run `callback` with the frame timestamp on the next frame
    pub fn request_frame<F>(&self, callback: F) -> FrameId
    where
        F: FnOnce(f64) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq();
        if inner.next_frame_at.is_none() {
            inner.next_frame_at = Some(inner.now + inner.frame_interval);
        }
        inner.frames.insert(Frame {
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending frame callback; returns whether it was still pending
    pub fn cancel_frame(&self, id: FrameId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let removed = inner.frames.remove(id).is_some();
        if inner.frames.is_empty() {
            inner.next_frame_at = None;
        }
        removed
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.contains_key(id)
    }

    pub fn is_frame_pending(&self, id: FrameId) -> bool {
        self.inner.borrow().frames.contains_key(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Whether nothing is scheduled
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.borrow();
        inner.timers.is_empty() && inner.frames.is_empty()
    }

    /// Move the clock forward by `ms`, running everything that comes due
    pub fn advance(&self, ms: f64) {
        let end = self.now() + ms.max(0.0);
        while let Some(step) = self.next_step(end) {
            match step {
                Step::Timer(id) => {
                    let timer = self.inner.borrow_mut().timers.remove(id);
                    if let Some(timer) = timer {
                        (timer.callback)();
                    }
                }
                Step::Frames => {
                    let (now, batch) = {
                        let mut inner = self.inner.borrow_mut();
                        inner.next_frame_at = None;
                        let mut batch: Vec<Frame> = inner.frames.drain().map(|(_, f)| f).collect();
                        batch.sort_by_key(|f| f.seq);
                        (inner.now, batch)
                    };
                    for frame in batch {
                        (frame.callback)(now);
                    }
                }
            }
        }
        self.inner.borrow_mut().now = end;
    }

    /// Advance until nothing is scheduled or `max_ms` has elapsed; returns
    /// whether the scheduler went idle
    pub fn run_until_idle(&self, max_ms: f64) -> bool {
        let deadline = self.now() + max_ms;
        while !self.is_idle() {
            let now = self.now();
            if now >= deadline {
                return false;
            }
            let step = self.inner.borrow().frame_interval.min(deadline - now);
            self.advance(step);
        }
        true
    }

    /// Pick the next due item at or before `end` and move the clock to it
    fn next_step(&self, end: f64) -> Option<Step> {
        let mut inner = self.inner.borrow_mut();
        let timer = inner.earliest_timer().filter(|(_, due)| *due <= end);
        let frame_at = inner.next_frame_at.filter(|at| *at <= end);

        let step = match (timer, frame_at) {
            (Some((id, due)), Some(at)) if due <= at => {
                inner.now = inner.now.max(due);
                Step::Timer(id)
            }
            (_, Some(at)) => {
                inner.now = inner.now.max(at);
                Step::Frames
            }
            (Some((id, due)), None) => {
                inner.now = inner.now.max(due);
                Step::Timer(id)
            }
            (None, None) => return None,
        };
        Some(step)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("timers", &inner.timers.len())
            .field("frames", &inner.frames.len())
            .finish()
    }
}

/// Restartable one-shot timer
///
/// Each call cancels the pending timer and starts a new one, so the callback
/// runs once per pause in activity.
#[derive(Debug)]
pub struct Debounce {
    wait_ms: u32,
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    /// Restart with a timer created by `schedule(wait_ms)`
    pub fn restart_with<F>(&mut self, scheduler: &Scheduler, schedule: F)
    where
        F: FnOnce(u32) -> TimerId,
    {
        self.cancel(scheduler);
        self.pending = Some(schedule(self.wait_ms));
    }

    /// Restart with a plain callback
    pub fn restart<F>(&mut self, scheduler: &Scheduler, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let wait = self.wait_ms;
        self.restart_with(scheduler, |_| scheduler.set_timeout(wait, callback));
    }

    pub fn cancel(&mut self, scheduler: &Scheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.clear_timeout(id);
        }
    }

    /// Forget the pending timer after it fired
    pub fn settle(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_timers_fire_in_due_order() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(50, "b"), (10, "a"), (50, "c")] {
            let log = Rc::clone(&log);
            scheduler.set_timeout(delay, move || log.borrow_mut().push(tag));
        }

        scheduler.advance(49.0);
        assert_eq!(*log.borrow(), vec!["a"]);
        scheduler.advance(1.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), 50.0);
    }

    #[test]
    fn test_clear_timeout() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = scheduler.set_timeout(5, move || flag.set(true));

        assert!(scheduler.clear_timeout(id));
        assert!(!scheduler.clear_timeout(id));
        scheduler.advance(100.0);
        assert!(!fired.get());
    }

    #[test]
    fn test_callback_can_schedule_more_work() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0.0));
        let inner_scheduler = scheduler.clone();
        let f = Rc::clone(&fired);
        scheduler.set_timeout(10, move || {
            let clock = inner_scheduler.clone();
            inner_scheduler.set_timeout(10, move || f.set(clock.now()));
        });

        scheduler.advance(100.0);
        assert_eq!(fired.get(), 20.0);
    }

    #[test]
    fn test_frames_batch_per_interval() {
        let scheduler = Scheduler::new();
        let stamps = Rc::new(RefCell::new(Vec::new()));

        fn tick(scheduler: Scheduler, stamps: Rc<RefCell<Vec<f64>>>, left: u32) {
            if left == 0 {
                return;
            }
            let next = scheduler.clone();
            scheduler.request_frame(move |now| {
                stamps.borrow_mut().push(now);
                tick(next, stamps, left - 1);
            });
        }

        tick(scheduler.clone(), Rc::clone(&stamps), 3);
        scheduler.advance(100.0);
        assert_eq!(*stamps.borrow(), vec![16.0, 32.0, 48.0]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_frame() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = scheduler.request_frame(move |_| flag.set(true));
        assert!(scheduler.cancel_frame(id));
        scheduler.advance(50.0);
        assert!(!fired.get());
    }

    #[test]
    fn test_debounce_runs_once_per_pause() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0));
        let mut debounce = Debounce::new(100);

        for _ in 0..5 {
            let c = Rc::clone(&count);
            debounce.restart(&scheduler, move || c.set(c.get() + 1));
            scheduler.advance(50.0);
        }
        assert_eq!(count.get(), 0);
        assert!(debounce.is_pending());

        scheduler.advance(50.0);
        assert_eq!(count.get(), 1);
        debounce.settle();
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_run_until_idle() {
        let scheduler = Scheduler::new();
        scheduler.set_timeout(500, || {});
        assert!(!scheduler.run_until_idle(100.0));
        assert!(scheduler.run_until_idle(1000.0));
        assert!(scheduler.now() >= 500.0 && scheduler.now() < 520.0);
    }
}
