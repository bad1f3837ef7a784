//! Scroll track: offset cache, nearest-panel lookup and scroll plumbing
//!
//! Offsets are measured from the track's `scroll-padding-left`, so a panel's
//! offset is the `scroll_left` that brings it to the snap edge.

use slidekit_animation::{Debounce, ScrollAnimator, ScrollOutcome, ScrollRequest};
use slidekit_core::{Config, Document, ElementId, Result, SlideError, Source};

use crate::host::Host;

/// Quiet period before a scroll position is resolved to a panel
pub const SCROLL_SETTLE_MS: u32 = 100;
/// Quiet period before a resize is applied
pub const RESIZE_SETTLE_MS: u32 = 100;

/// Find the `data-track` element under `root`
pub fn find_track(doc: &Document, root: ElementId) -> Result<ElementId> {
    doc.query_attr(root, "data-track", None)
        .into_iter()
        .next()
        .ok_or(SlideError::MissingTrack)
}

pub struct ScrollTrack {
    element: ElementId,
    flex: bool,
    offsets: Vec<f32>,
    right_offsets: Vec<f32>,
    animator: ScrollAnimator,
    duration_ms: u32,
    listening: bool,
    viewport_width: f32,
    pub(crate) scroll_debounce: Debounce,
    pub(crate) resize_debounce: Debounce,
}

impl ScrollTrack {
    pub fn new(host: &Host, element: ElementId, flex: bool, duration_ms: u32) -> Self {
        Self {
            element,
            flex,
            offsets: Vec::new(),
            right_offsets: Vec::new(),
            animator: ScrollAnimator::new(host.doc(), host.scheduler()),
            duration_ms,
            listening: false,
            viewport_width: 0.0,
            scroll_debounce: Debounce::new(SCROLL_SETTLE_MS),
            resize_debounce: Debounce::new(RESIZE_SETTLE_MS),
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn right_offsets(&self) -> &[f32] {
        &self.right_offsets
    }

    pub fn offset(&self, index: usize) -> Option<f32> {
        self.offsets.get(index).copied()
    }

    /// Rebuild the offset cache for `panels`
    pub fn measure(&mut self, doc: &Document, panels: &[ElementId]) {
        let padding = doc.style_px(self.element, "scroll-padding-left");
        self.offsets = panels
            .iter()
            .map(|&panel| doc.offset_left(panel) - padding)
            .collect();
        self.right_offsets = if self.flex {
            panels
                .iter()
                .zip(&self.offsets)
                .map(|(&panel, left)| left + doc.width(panel))
                .collect()
        } else {
            Vec::new()
        };
        tracing::trace!(panels = panels.len(), "measured track offsets");
    }

    /// Panel index that `scroll_left` settles on
    pub fn nearest_index(&self, doc: &Document, scroll_left: f32) -> Option<usize> {
        if self.offsets.is_empty() {
            return None;
        }
        if self.flex {
            return Some(self.nearest_flex(doc, scroll_left));
        }
        Some(nearest_left(&self.offsets, scroll_left))
    }

    fn nearest_flex(&self, doc: &Document, target: f32) -> usize {
        let last = self.offsets.len() - 1;
        let max = doc.max_scroll_left(self.element);
        // Trailing panels narrower than the track never reach the snap edge
        if max > 0.0 && target >= max - 0.5 {
            return last;
        }
        let window = self
            .offsets
            .iter()
            .zip(&self.right_offsets)
            .position(|(&left, &right)| left <= target && target < right);
        match window {
            Some(i) if i < last && self.right_offsets[i] - target < target - self.offsets[i] => {
                i + 1
            }
            Some(i) => i,
            None => nearest_left(&self.offsets, target),
        }
    }

    /// Scroll to `target`, animated for clicks
    pub fn scroll_to(
        &self,
        doc: &mut Document,
        config: &Config,
        target: f32,
        source: Source,
    ) -> ScrollOutcome {
        self.animator.scroll_to(
            doc,
            config,
            ScrollRequest {
                track: self.element,
                target,
                source,
                duration_ms: self.duration_ms,
            },
        )
    }

    pub fn cancel_animation(&self, doc: &mut Document) {
        self.animator.cancel(doc);
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn listen(&mut self) {
        self.listening = true;
    }

    /// Stop reacting to scroll events and drop a pending scroll resolution
    pub fn stop_listening(&mut self, host: &Host) {
        self.listening = false;
        self.scroll_debounce.cancel(host.scheduler());
    }

    /// Record a new viewport width; `false` when it did not change
    pub fn update_viewport(&mut self, width: f32) -> bool {
        if (width - self.viewport_width).abs() < f32::EPSILON {
            return false;
        }
        self.viewport_width = width;
        true
    }

    /// Panel the track came to rest on once the scroll debounce fired;
    /// `None` while scroll events are ignored
    pub fn take_settled_index(&mut self, doc: &Document) -> Option<usize> {
        self.scroll_debounce.settle();
        if !self.listening {
            return None;
        }
        self.nearest_index(doc, doc.scroll_left(self.element))
    }

    /// Consume a fired resize debounce; `true` when the viewport width moved
    pub fn take_resize(&mut self, doc: &Document) -> bool {
        self.resize_debounce.settle();
        self.update_viewport(doc.viewport_width())
    }

    /// Cancel every pending timer and animation
    pub fn release(&mut self, host: &Host, doc: &mut Document) {
        self.listening = false;
        self.scroll_debounce.cancel(host.scheduler());
        self.resize_debounce.cancel(host.scheduler());
        self.animator.cancel(doc);
    }
}

impl std::fmt::Debug for ScrollTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTrack")
            .field("element", &self.element)
            .field("flex", &self.flex)
            .field("offsets", &self.offsets)
            .field("listening", &self.listening)
            .finish()
    }
}

/// Index of the offset closest to `target`; ties go to the lower index
fn nearest_left(offsets: &[f32], target: f32) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (i, &offset) in offsets.iter().enumerate() {
        let distance = (offset - target).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
