//! Activation requests and resolved index sets

use serde::Serialize;
use slidekit_core::Source;

/// The sole input to a tab transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActivationRequest {
    /// Requested tab index
    pub current: usize,
    /// Unfolded index for relative moves (may step past either end)
    pub raw: Option<isize>,
    pub source: Source,
}

impl ActivationRequest {
    pub fn new(current: usize, source: Source) -> Self {
        Self {
            current,
            raw: None,
            source,
        }
    }

    pub fn click(current: usize) -> Self {
        Self::new(current, Source::Click).with_raw(current as isize)
    }

    pub fn with_raw(mut self, raw: isize) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// A resolved transition plan
///
/// `current_index`/`last_index` index into the tabs, `panel_index`/
/// `last_panel_index` into the panels. They only differ when a behavior
/// virtualizes panels (loop sliders).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IndexSet {
    pub raw_index: Option<isize>,
    pub current_index: usize,
    pub last_index: usize,
    pub panel_index: usize,
    pub last_panel_index: usize,
    pub end_index: usize,
    pub source: Source,
}

impl IndexSet {
    /// Seed from a request and the previously active indexes
    pub fn seed(
        request: &ActivationRequest,
        last_index: usize,
        last_panel_index: usize,
        end_index: usize,
    ) -> Self {
        Self {
            raw_index: request.raw,
            current_index: request.current,
            last_index,
            panel_index: request.current,
            last_panel_index,
            end_index,
            source: request.source,
        }
    }

    /// Clamp the tab index to `end_index` and pair it with the same panel
    pub fn clamped(mut self) -> Self {
        self.current_index = self.current_index.min(self.end_index);
        self.panel_index = self.current_index;
        self
    }
}
