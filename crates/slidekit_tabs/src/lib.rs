//! Slidekit Tabs
//!
//! Accessible tab components built on one activation state machine:
//!
//! - [`PlainTabs`]: tabs with panels hidden after the transition delay
//! - [`Slider`]: panels side by side in a scroll track, with `single`,
//!   `group` and `flex` layouts and an endless loop mode
//! - [`SliderGroup`]: a breakpoint-grouped slider that never loops
//!
//! Components attach to markup (`role="tab"`, `role="tabpanel"`, a
//! `data-track` element) in a [`Host`] document, and the host forwards input
//! through `handle_click`, `handle_key`, `handle_scroll` and `handle_resize`.
//!
//! # Example
//!
//! ```ignore
//! use slidekit_tabs::{Host, Slider, ACTIVATE};
//!
//! let host = Host::new(doc, scheduler.clone());
//! let slider = Slider::attach(&host, root)?;
//! slider.subscribe(ACTIVATE, |event| {
//!     tracing::info!(index = event.indexes.current_index, "slide changed");
//! });
//! slider.handle_key("ArrowRight");
//! scheduler.advance(300.0);
//! ```

pub mod breakpoints;
pub mod event;
pub mod host;
pub mod index;
pub mod options;
pub mod slider;
pub mod slider_group;
pub mod tabs;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use breakpoints::{Breakpoint, Breakpoints, GroupLayout, PanelGroup, Regrouper};
pub use event::{TabsEvent, TabsEventKind, ACTIVATE, ACTIVATED, DEACTIVATE};
pub use host::Host;
pub use index::{ActivationRequest, IndexSet};
pub use options::{Direction, LayoutType, SliderOptions, TabsOptions};
pub use slider::{Slider, SliderBehavior, SliderTask};
pub use slider_group::{SliderGroup, SliderGroupBehavior};
pub use tabs::{HookContext, PanelVisibility, PlainTabs, TabPanels, Tabs, TabsBehavior, TabsState};
pub use track::ScrollTrack;
