//! Slidekit Animation
//!
//! Time and motion for the slidekit components.
//!
//! # Features
//!
//! - **Scheduler**: single-threaded virtual clock with timeouts and animation
//!   frames, driven by the host
//! - **Debounce**: restartable one-shot timers for scroll and resize handlers
//! - **Easing**: sine curves used by the scroll animator
//! - **Scroll Animator**: eased or immediate scroll-to with cancellation

pub mod easing;
pub mod scheduler;
pub mod scroll;

pub use easing::{ease_in_out_sine, Easing};
pub use scheduler::{Debounce, FrameId, Scheduler, TimerId, FRAME_INTERVAL_MS};
pub use scroll::{ScrollAnimator, ScrollOutcome, ScrollRequest};
