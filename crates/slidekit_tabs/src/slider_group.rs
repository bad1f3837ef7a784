//! Breakpoint-grouped slider without looping
//!
//! Items are dealt into panels by viewport width; the reachable tabs shrink
//! and grow with the grouping. Requests past the last visible panel are
//! clamped rather than folded.

use std::ops::Deref;

use slidekit_core::{ElementId, Result, Source};

use crate::breakpoints::{Breakpoints, PanelGroup, Regrouper};
use crate::event::TabsEvent;
use crate::host::Host;
use crate::index::ActivationRequest;
use crate::options::SliderOptions;
use crate::slider::{panel_items, SliderTask};
use crate::tabs::{swap_inert, HookContext, PanelVisibility, Tabs, TabsBehavior};
use crate::track::{find_track, ScrollTrack};

#[derive(Debug, Default)]
pub struct SliderGroupBehavior {
    track: Option<ScrollTrack>,
    regrouper: Option<Regrouper>,
    panels: Vec<ElementId>,
    items: Vec<ElementId>,
}

impl SliderGroupBehavior {
    pub fn track(&self) -> Option<&ScrollTrack> {
        self.track.as_ref()
    }

    pub fn regrouper(&self) -> Option<&Regrouper> {
        self.regrouper.as_ref()
    }

    fn apply_layout(&mut self, cx: &mut HookContext<'_, Self>) {
        let tabs = cx.state.tabs().to_vec();
        let Some(regrouper) = self.regrouper.as_mut() else {
            return;
        };
        let group = PanelGroup {
            tabs: &tabs,
            panels: &self.panels,
            items: &self.items,
        };
        let (doc, host) = cx.split();
        let width = doc.viewport_width();
        regrouper.move_groups(doc, width, host.config(), &[group]);
        let end_index = regrouper.layout().map_or(0, |layout| layout.end_index());
        cx.state.set_end_index(end_index);

        if let Some(track) = self.track.as_mut() {
            let visible = &self.panels[..(cx.state.end_index() + 1).min(self.panels.len())];
            track.measure(cx.doc, visible);
        }
    }

    fn schedule(&mut self, cx: &mut HookContext<'_, Self>, task: SliderTask) -> bool {
        let Some(track) = self.track.as_mut() else {
            return false;
        };
        let debounce = match task {
            SliderTask::SettleScroll if !track.is_listening() => return false,
            SliderTask::SettleScroll => &mut track.scroll_debounce,
            SliderTask::ApplyResize => &mut track.resize_debounce,
        };
        debounce.restart_with(cx.scheduler(), |wait| cx.schedule(wait, task));
        true
    }
}

impl TabsBehavior for SliderGroupBehavior {
    type Task = SliderTask;

    fn init(&mut self, cx: &mut HookContext<'_, Self>) -> Result<()> {
        let root = cx.state.root();
        let options = SliderOptions::from_element(cx.doc, root);
        let element = find_track(cx.doc, root)?;

        self.panels = cx.state.panels().to_vec();
        self.items = panel_items(cx.doc, &self.panels);
        let breakpoints = Breakpoints::parse(
            options.breakpoints.as_deref().unwrap_or_default(),
            options.visible.as_deref().unwrap_or_default(),
            self.items.len(),
        )?;
        self.regrouper = Some(Regrouper::new(breakpoints));

        let duration = options.duration_ms.unwrap_or(cx.state.options().delay_ms);
        let mut track = ScrollTrack::new(cx.host(), element, false, duration);
        track.update_viewport(cx.doc.viewport_width());
        self.track = Some(track);
        self.apply_layout(cx);

        tracing::debug!(
            items = self.items.len(),
            end_index = cx.state.end_index(),
            "slider group initialized"
        );
        Ok(())
    }

    fn on_deactivate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        if let Some(track) = self.track.as_mut() {
            let (doc, host) = cx.split();
            track.cancel_animation(doc);
            if event.source != Source::Scroll {
                track.stop_listening(host);
            }
        }
        swap_inert(cx.doc, event);
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
                if let Some(index) = track.take_settled_index(cx.doc) {
                    if index != cx.state.current_index() {
                        cx.request_activation(
                            ActivationRequest::new(index, Source::Scroll)
                                .with_raw(index as isize),
                        );
                    }
                }
            }
            SliderTask::ApplyResize => {
                if !track.take_resize(cx.doc) {
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

/// Grouped slider component
#[derive(Debug)]
pub struct SliderGroup {
    tabs: Tabs<SliderGroupBehavior>,
}

impl SliderGroup {
    pub fn attach(host: &Host, root: ElementId) -> Result<Self> {
        Ok(Self {
            tabs: Tabs::attach(host, root, SliderGroupBehavior::default())?,
        })
    }

    pub fn handle_scroll(&self) -> bool {
        self.tabs
            .dispatch(|behavior, cx| behavior.schedule(cx, SliderTask::SettleScroll))
            .unwrap_or(false)
    }

    pub fn handle_resize(&self) -> bool {
        self.tabs
            .dispatch(|behavior, cx| behavior.schedule(cx, SliderTask::ApplyResize))
            .unwrap_or(false)
    }

    pub fn offsets(&self) -> Vec<f32> {
        self.tabs
            .behavior(|b| b.track().map(|t| t.offsets().to_vec()).unwrap_or_default())
    }
}

impl Deref for SliderGroup {
    type Target = Tabs<SliderGroupBehavior>;

    fn deref(&self) -> &Self::Target {
        &self.tabs
    }
}
