//! Scroll-synchronized slider
//!
//! A [`Slider`] is a tabs component whose panels sit side by side in a
//! scrollable track. Activations scroll the track to the panel; scrolling the
//! track by hand activates the panel it settles on.
//!
//! Root attributes: `type` (`single`, `group`, `flex`), `loop`,
//! `breakpoints` / `visible` (group layout), `duration`, plus the common
//! `delay` / `direction`.
//!
//! # Loop mode
//!
//! The panel sequence is cloned twice and the clones appended, giving three
//! copies of `L` visible panels. The component starts in the middle copy.
//! When an activation targets a panel in the first or last copy, the copy at
//! the opposite end is moved across in one detach/reinsert and `scroll_left`
//! is shifted by the same amount, so the user never reaches an edge:
//!
//! ```text
//! [ A0 B0 C0 | A1 B1 C1 | A2 B2 C2 ]   target A2 in the last copy
//! [ A1 B1 C1 | A2 B2 C2 | A0 B0 C0 ]   first copy moved to the end, A2 now in the middle
//! ```
//!
//! Tab indexes stay in `[0, L)`; `panel_index` is the physical position.

use std::ops::Deref;

use slidekit_core::focus::{focusable_items, toggle_focusability};
use slidekit_core::{Document, ElementId, Result, Source};

use crate::breakpoints::{Breakpoints, PanelGroup, Regrouper};
use crate::event::TabsEvent;
use crate::host::Host;
use crate::index::{ActivationRequest, IndexSet};
use crate::options::{LayoutType, SliderOptions};
use crate::tabs::{HookContext, PanelVisibility, Tabs, TabsBehavior};
use crate::track::{find_track, ScrollTrack};

/// Copies in loop mode: the originals plus two clones
const LOOP_COPIES: usize = 3;

/// Deferred slider work
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderTask {
    /// Scroll debounce elapsed
    SettleScroll,
    /// Resize debounce elapsed
    ApplyResize,
}

/// One copy of the panel sequence, in document order
#[derive(Clone, Debug)]
struct PanelCopy {
    /// 0 for the original panels
    copy_index: usize,
    panels: Vec<ElementId>,
    items: Vec<ElementId>,
}

#[derive(Debug, Default)]
pub struct SliderBehavior {
    options: SliderOptions,
    track: Option<ScrollTrack>,
    regrouper: Option<Regrouper>,
    copies: Vec<PanelCopy>,
    loop_init_length: usize,
    loop_current_index: usize,
    rotations: usize,
}

impl SliderBehavior {
    pub fn options(&self) -> &SliderOptions {
        &self.options
    }

    pub fn track(&self) -> Option<&ScrollTrack> {
        self.track.as_ref()
    }

    /// Panels per loop copy
    pub fn loop_init_length(&self) -> usize {
        self.loop_init_length
    }

    /// Copy holding the current panel (0..3)
    pub fn loop_current_index(&self) -> usize {
        self.loop_current_index
    }

    /// Boundary rotations performed so far
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Regroup for the current viewport, then rebuild the panel list, end
    /// index and offsets
    fn apply_layout(&mut self, cx: &mut HookContext<'_, Self>) {
        let tabs = cx.state.tabs().to_vec();
        let no_tabs: &[ElementId] = &[];
        let originals = self.copies.first().map_or(0, |copy| copy.panels.len());
        let visible = match self.regrouper.as_mut() {
            Some(regrouper) => {
                let groups: Vec<PanelGroup<'_>> = self
                    .copies
                    .iter()
                    .map(|copy| PanelGroup {
                        tabs: if copy.copy_index == 0 { tabs.as_slice() } else { no_tabs },
                        panels: &copy.panels,
                        items: &copy.items,
                    })
                    .collect();
                let (doc, host) = cx.split();
                let width = doc.viewport_width();
                regrouper.move_groups(doc, width, host.config(), &groups);
                regrouper.layout().map_or(originals, |layout| layout.panel_count)
            }
            None => originals,
        };
        let length = visible.min(tabs.len()).max(1);

        let panels: Vec<ElementId> = if self.options.looped {
            self.copies
                .iter()
                .flat_map(|copy| copy.panels.iter().take(length).copied())
                .collect()
        } else {
            self.copies
                .first()
                .map(|copy| copy.panels.clone())
                .unwrap_or_default()
        };
        cx.state.set_panels(panels);
        cx.state.set_end_index(length - 1);
        self.loop_init_length = if self.options.looped { length } else { 0 };

        if let Some(track) = self.track.as_mut() {
            let panels = cx.state.panels();
            let measured = if self.options.looped {
                panels
            } else {
                &panels[..length.min(panels.len())]
            };
            track.measure(cx.doc, measured);
        }
    }

    /// Move the opposite copy across when `indexes` targets an outer copy
    fn recycle(&mut self, cx: &mut HookContext<'_, Self>, indexes: &mut IndexSet) {
        let length = self.loop_init_length;
        if self.copies.len() != LOOP_COPIES || length == 0 {
            return;
        }
        let Some(track) = self.track.as_mut() else {
            return;
        };
        let (Some(target), Some(lead_end), Some(trail_start)) = (
            track.offset(indexes.panel_index),
            track.offset(length),
            track.offset(2 * length),
        ) else {
            return;
        };
        let forward = if target >= trail_start {
            true
        } else if target < lead_end {
            false
        } else {
            return;
        };

        // A panel that stays put; its shift is the scroll correction
        let (anchor_before, anchor_after) = if forward { (length, 0) } else { (0, length) };
        let Some(anchor_left) = track.offset(anchor_before) else {
            return;
        };
        let scroll = cx.doc.scroll_left(track.element());

        if forward {
            let block = self.copies.remove(0);
            let reference = self
                .copies
                .last()
                .and_then(|copy| copy.panels.last())
                .and_then(|&last| cx.doc.next_sibling(last));
            move_block(cx.doc, &block.panels, reference);
            self.copies.push(block);
        } else if let Some(block) = self.copies.pop() {
            let reference = self.copies.first().and_then(|copy| copy.panels.first()).copied();
            move_block(cx.doc, &block.panels, reference);
            self.copies.insert(0, block);
        }

        let panels: Vec<ElementId> = self
            .copies
            .iter()
            .flat_map(|copy| copy.panels.iter().take(length).copied())
            .collect();
        track.measure(cx.doc, &panels);
        cx.state.set_panels(panels);

        let shift = track.offset(anchor_after).unwrap_or(anchor_left) - anchor_left;
        cx.doc.set_scroll_left(track.element(), scroll + shift);

        let total = length * LOOP_COPIES;
        let step = if forward { 2 * length } else { length };
        let remap = |index: usize| (index + step) % total;
        indexes.panel_index = remap(indexes.panel_index);
        indexes.last_panel_index = remap(indexes.last_panel_index);
        cx.state.set_panel_index(remap(cx.state.panel_index()));
        self.loop_current_index = indexes.panel_index / length;
        self.rotations += 1;

        tracing::debug!(
            forward,
            shift,
            panel = indexes.panel_index,
            rotations = self.rotations,
            "recycled loop copy"
        );
    }

    fn schedule_scroll(&mut self, cx: &mut HookContext<'_, Self>) -> bool {
        let Some(track) = self.track.as_mut() else {
            return false;
        };
        if !track.is_listening() {
            return false;
        }
        track.scroll_debounce.restart_with(cx.scheduler(), |wait| {
            cx.schedule(wait, SliderTask::SettleScroll)
        });
        true
    }

    fn schedule_resize(&mut self, cx: &mut HookContext<'_, Self>) -> bool {
        let Some(track) = self.track.as_mut() else {
            return false;
        };
        track.resize_debounce.restart_with(cx.scheduler(), |wait| {
            cx.schedule(wait, SliderTask::ApplyResize)
        });
        true
    }
}

impl TabsBehavior for SliderBehavior {
    type Task = SliderTask;

    fn init(&mut self, cx: &mut HookContext<'_, Self>) -> Result<()> {
        let root = cx.state.root();
        self.options = SliderOptions::from_element(cx.doc, root);
        let element = find_track(cx.doc, root)?;

        let originals = cx.state.panels().to_vec();
        let grouped = self.options.layout == LayoutType::Group;
        let items = if grouped {
            panel_items(cx.doc, &originals)
        } else {
            Vec::new()
        };
        if grouped {
            let breakpoints = Breakpoints::parse(
                self.options.breakpoints.as_deref().unwrap_or_default(),
                self.options.visible.as_deref().unwrap_or_default(),
                items.len(),
            )?;
            self.regrouper = Some(Regrouper::new(breakpoints));
        }

        for &panel in &originals {
            let focusable = focusable_items(cx.doc, panel);
            toggle_focusability(cx.doc, &focusable, false);
        }

        self.copies = vec![PanelCopy {
            copy_index: 0,
            panels: originals.clone(),
            items,
        }];
        if self.options.looped {
            let parent = originals
                .first()
                .and_then(|&panel| cx.doc.parent(panel))
                .unwrap_or(element);
            for clone in 1..LOOP_COPIES {
                let copy = clone_panels(cx.doc, parent, &originals, clone);
                self.copies.push(copy);
            }
            self.loop_current_index = 1;
        }

        let duration = self
            .options
            .duration_ms
            .unwrap_or(cx.state.options().delay_ms);
        let mut track = ScrollTrack::new(
            cx.host(),
            element,
            self.options.layout == LayoutType::Flex,
            duration,
        );
        track.update_viewport(cx.doc.viewport_width());
        self.track = Some(track);
        self.apply_layout(cx);

        tracing::debug!(
            layout = ?self.options.layout,
            looped = self.options.looped,
            panels = cx.state.panels().len(),
            "slider initialized"
        );
        Ok(())
    }

    fn resolve(&mut self, cx: &mut HookContext<'_, Self>, indexes: IndexSet) -> IndexSet {
        let length = self.loop_init_length;
        if !self.options.looped || length == 0 {
            return indexes.clamped();
        }
        let total = length * self.copies.len();
        let mut indexes = indexes;
        let panel = match indexes.source {
            Source::Init => indexes.current_index % length + length,
            Source::Click => {
                let raw = indexes
                    .raw_index
                    .unwrap_or(indexes.current_index as isize);
                let expanded = raw + (length * self.loop_current_index) as isize;
                expanded.clamp(0, total as isize - 1) as usize
            }
            Source::Scroll => indexes.current_index.min(total - 1),
            Source::Resize => indexes.current_index % length + length * self.loop_current_index,
        };
        indexes.panel_index = panel;
        indexes.current_index = panel % length;
        indexes.end_index = length - 1;
        self.loop_current_index = panel / length;
        self.recycle(cx, &mut indexes);
        indexes
    }

    fn on_deactivate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        if let Some(track) = self.track.as_mut() {
            let (doc, host) = cx.split();
            track.cancel_animation(doc);
            if event.source != Source::Scroll {
                track.stop_listening(host);
            }
        }
        let outgoing = focusable_items(cx.doc, event.last_panel);
        toggle_focusability(cx.doc, &outgoing, false);
        let incoming = focusable_items(cx.doc, event.panel);
        toggle_focusability(cx.doc, &incoming, true);
    }

    fn on_activate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        if event.source == Source::Scroll {
            return;
        }
        let Some(track) = self.track.as_ref() else {
            return;
        };
        if let Some(target) = track.offset(event.indexes.panel_index) {
            let (doc, host) = cx.split();
            track.scroll_to(doc, host.config(), target, event.source);
        }
    }

    fn on_activated(&mut self, _cx: &mut HookContext<'_, Self>, _event: &TabsEvent) {
        if let Some(track) = self.track.as_mut() {
            track.listen();
        }
    }

    fn run_task(&mut self, cx: &mut HookContext<'_, Self>, task: SliderTask) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        match task {
            SliderTask::SettleScroll => {
                let Some(index) = track.take_settled_index(cx.doc) else {
                    return;
                };
                if index != cx.state.panel_index() {
                    cx.request_activation(
                        ActivationRequest::new(index, Source::Scroll).with_raw(index as isize),
                    );
                }
            }
            SliderTask::ApplyResize => {
                if !track.take_resize(cx.doc) {
                    tracing::trace!("resize ignored, viewport width unchanged");
                    return;
                }
                self.apply_layout(cx);
                let current = cx.state.current_index();
                cx.request_activation(ActivationRequest::new(current, Source::Resize));
            }
        }
    }

    fn panel_visibility(&self) -> PanelVisibility {
        PanelVisibility::AriaHidden
    }

    fn detach(&mut self, cx: &mut HookContext<'_, Self>) {
        if let Some(track) = self.track.as_mut() {
            let (doc, host) = cx.split();
            track.release(host, doc);
        }
    }
}

/// Slider component
#[derive(Debug)]
pub struct Slider {
    tabs: Tabs<SliderBehavior>,
}

impl Slider {
    pub fn attach(host: &Host, root: ElementId) -> Result<Self> {
        Ok(Self {
            tabs: Tabs::attach(host, root, SliderBehavior::default())?,
        })
    }

    /// Track scrolled; resolves to a panel once scrolling pauses
    pub fn handle_scroll(&self) -> bool {
        self.tabs
            .dispatch(|behavior, cx| behavior.schedule_scroll(cx))
            .unwrap_or(false)
    }

    /// Window resized; applied once resizing pauses
    pub fn handle_resize(&self) -> bool {
        self.tabs
            .dispatch(|behavior, cx| behavior.schedule_resize(cx))
            .unwrap_or(false)
    }

    pub fn loop_current_index(&self) -> usize {
        self.tabs.behavior(SliderBehavior::loop_current_index)
    }

    pub fn loop_init_length(&self) -> usize {
        self.tabs.behavior(SliderBehavior::loop_init_length)
    }

    pub fn rotations(&self) -> usize {
        self.tabs.behavior(SliderBehavior::rotations)
    }

    pub fn offsets(&self) -> Vec<f32> {
        self.tabs
            .behavior(|b| b.track().map(|t| t.offsets().to_vec()).unwrap_or_default())
    }

    pub fn is_listening(&self) -> bool {
        self.tabs
            .behavior(|b| b.track().is_some_and(ScrollTrack::is_listening))
    }
}

impl Deref for Slider {
    type Target = Tabs<SliderBehavior>;

    fn deref(&self) -> &Self::Target {
        &self.tabs
    }
}

/// Children of each panel, in order
pub(crate) fn panel_items(doc: &Document, panels: &[ElementId]) -> Vec<ElementId> {
    panels
        .iter()
        .flat_map(|&panel| doc.children(panel).iter().copied())
        .collect()
}

/// Detach `panels` and reinsert them, in order, before `reference`
fn move_block(doc: &mut Document, panels: &[ElementId], reference: Option<ElementId>) {
    let Some(parent) = panels.first().and_then(|&panel| doc.parent(panel)) else {
        return;
    };
    for &panel in panels {
        doc.detach(panel);
    }
    for &panel in panels {
        doc.insert_before(parent, panel, reference);
    }
}

/// Deep-clone `originals` into `parent` as loop copy number `clone`
fn clone_panels(
    doc: &mut Document,
    parent: ElementId,
    originals: &[ElementId],
    clone: usize,
) -> PanelCopy {
    let mut panels = Vec::with_capacity(originals.len());
    for &original in originals {
        let Some(copy) = doc.deep_clone(original) else {
            continue;
        };
        let mut subtree = vec![copy];
        subtree.extend(doc.descendants(copy));
        for id in subtree {
            if let Some(value) = doc.get_attribute(id, "id").map(str::to_string) {
                doc.set_attribute(id, "id", format!("{value}-clone-{clone}"));
            }
        }
        doc.remove_attribute(copy, "data-selected");
        doc.set_attribute(copy, "data-clone", clone.to_string());
        doc.append_child(parent, copy);
        panels.push(copy);
    }
    let items = panel_items(doc, &panels);
    PanelCopy {
        copy_index: clone,
        panels,
        items,
    }
}
