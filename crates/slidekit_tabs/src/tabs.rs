//! Tab activation state machine
//!
//! [`Tabs`] owns the current tab/panel pair of one component and turns
//! activation requests into attribute changes and lifecycle events. Variants
//! (plain tabs, sliders) plug in through [`TabsBehavior`]: a resolution hook
//! that may remap the requested indexes, lifecycle hooks around each step, and
//! deferred tasks run on the host scheduler.
//!
//! # Transition
//!
//! 1. pending settle timer cleared, indexes resolved
//! 2. previous tab leaves the tab order, previous panel loses `data-selected`,
//!    `tabs:deactivate` fires
//! 3. new tab joins the tab order, new panel gains `data-selected`,
//!    `tabs:activate` fires
//! 4. after the transition delay the panels are swapped and `tabs:activated`
//!    fires
//!
//! Events are queued while component state is borrowed and dispatched once it
//! is released, so listeners may call straight back into the component.
//!
//! # Example
//!
//! ```ignore
//! let tabs = Tabs::attach(&host, root, TabPanels)?;
//! tabs.subscribe(ACTIVATE, |event| println!("now on {}", event.indexes.current_index));
//! tabs.handle_key("ArrowRight");
//! host.scheduler().advance(300.0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slidekit_animation::{Scheduler, TimerId};
use slidekit_core::{Config, Document, ElementId, EventBus, Key, ListenerId, Result, SlideError, Source};
use smallvec::SmallVec;

use crate::event::{TabsEvent, TabsEventKind};
use crate::host::Host;
use crate::index::{ActivationRequest, IndexSet};
use crate::options::{Direction, TabsOptions};

// ============================================================================
// Behavior
// ============================================================================

/// How panels are taken out of view once a transition settles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelVisibility {
    /// `hidden` attribute (removed from layout)
    Hidden,
    /// `aria-hidden` (stays in layout, e.g. slider panels)
    AriaHidden,
}

/// Per-variant hooks around the shared state machine
///
/// Every hook gets a [`HookContext`] with the document and state already
/// borrowed. Hooks must not call back into the component directly; use
/// [`HookContext::request_activation`] or [`HookContext::schedule`].
pub trait TabsBehavior: Sized + 'static {
    /// Deferred work scheduled through [`HookContext::schedule`]
    type Task: 'static;

    /// Runs once at attach, before the initial activation
    fn init(&mut self, cx: &mut HookContext<'_, Self>) -> Result<()> {
        let _ = cx;
        Ok(())
    }

    /// Map a seeded index set to the tab and panel to activate
    fn resolve(&mut self, cx: &mut HookContext<'_, Self>, indexes: IndexSet) -> IndexSet {
        let _ = cx;
        indexes.clamped()
    }

    fn on_deactivate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        let _ = (cx, event);
    }

    fn on_activate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        let _ = (cx, event);
    }

    /// Runs after the panels were swapped
    fn on_activated(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        let _ = (cx, event);
    }

    fn run_task(&mut self, cx: &mut HookContext<'_, Self>, task: Self::Task) {
        let _ = (cx, task);
    }

    fn panel_visibility(&self) -> PanelVisibility {
        PanelVisibility::Hidden
    }

    /// Release timers, animations and listeners
    fn detach(&mut self, cx: &mut HookContext<'_, Self>) {
        let _ = cx;
    }
}

/// Plain tabs: the outgoing panel is made `inert`
#[derive(Clone, Copy, Debug, Default)]
pub struct TabPanels;

impl TabsBehavior for TabPanels {
    type Task = ();

    fn on_deactivate(&mut self, cx: &mut HookContext<'_, Self>, event: &TabsEvent) {
        swap_inert(cx.doc, event);
    }
}

/// Mark the outgoing panel `inert` and release the incoming one
pub fn swap_inert(doc: &mut Document, event: &TabsEvent) {
    doc.set_attribute(event.last_panel, "inert", "");
    doc.remove_attribute(event.panel, "inert");
}

// ============================================================================
// State
// ============================================================================

/// Mutable state of one component
#[derive(Debug)]
pub struct TabsState {
    root: ElementId,
    tabs: Vec<ElementId>,
    panels: Vec<ElementId>,
    current_index: usize,
    panel_index: usize,
    end_index: usize,
    options: TabsOptions,
    settle_timer: Option<TimerId>,
}

impl TabsState {
    fn new(root: ElementId, tabs: Vec<ElementId>, panels: Vec<ElementId>, options: TabsOptions) -> Self {
        let end_index = tabs.len().min(panels.len()).saturating_sub(1);
        Self {
            root,
            tabs,
            panels,
            current_index: 0,
            panel_index: 0,
            end_index,
            options,
            settle_timer: None,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn tabs(&self) -> &[ElementId] {
        &self.tabs
    }

    pub fn panels(&self) -> &[ElementId] {
        &self.panels
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn panel_index(&self) -> usize {
        self.panel_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    /// Replace the panel sequence (loop copies, regrouped layouts)
    pub fn set_panels(&mut self, panels: Vec<ElementId>) {
        self.panels = panels;
    }

    /// Set the last reachable tab index, bounded by the tab count
    pub fn set_end_index(&mut self, end_index: usize) {
        self.end_index = end_index.min(self.tabs.len().saturating_sub(1));
    }

    pub fn set_panel_index(&mut self, panel_index: usize) {
        self.panel_index = panel_index;
    }
}

// ============================================================================
// Hook context
// ============================================================================

#[derive(Default)]
struct Outbox {
    events: SmallVec<[TabsEvent; 3]>,
    requests: Vec<ActivationRequest>,
}

/// Borrowed view handed to [`TabsBehavior`] hooks
pub struct HookContext<'a, B: TabsBehavior> {
    pub doc: &'a mut Document,
    pub state: &'a mut TabsState,
    host: &'a Host,
    weak: &'a Weak<Shared<B>>,
    outbox: &'a mut Outbox,
}

impl<B: TabsBehavior> HookContext<'_, B> {
    pub fn host(&self) -> &Host {
        self.host
    }

    pub fn config(&self) -> &Config {
        self.host.config()
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.host.scheduler()
    }

    /// Document and host at once (host methods otherwise borrow the context)
    pub fn split(&mut self) -> (&mut Document, &Host) {
        (&mut *self.doc, self.host)
    }

    /// Run `task` through [`TabsBehavior::run_task`] after `delay_ms`
    pub fn schedule(&self, delay_ms: u32, task: B::Task) -> TimerId {
        let weak = self.weak.clone();
        self.host.scheduler().set_timeout(delay_ms, move || {
            if let Some(shared) = weak.upgrade() {
                shared.enter(|behavior, cx| behavior.run_task(cx, task));
            }
        })
    }

    /// Activate once the current hook returns
    pub fn request_activation(&mut self, request: ActivationRequest) {
        self.outbox.requests.push(request);
    }

    fn schedule_settle(&self, delay_ms: u32, event: TabsEvent) -> TimerId {
        let weak = self.weak.clone();
        self.host.scheduler().set_timeout(delay_ms, move || {
            if let Some(shared) = weak.upgrade() {
                shared.enter(|behavior, cx| {
                    cx.state.settle_timer = None;
                    settle(behavior, cx, event);
                });
            }
        })
    }
}

// ============================================================================
// Shared core
// ============================================================================

struct Inner<B> {
    state: TabsState,
    behavior: B,
    detached: bool,
}

struct Shared<B: TabsBehavior> {
    host: Host,
    events: EventBus<TabsEvent>,
    inner: RefCell<Inner<B>>,
}

impl<B: TabsBehavior> Shared<B> {
    /// Borrow document and state, run `f`, then flush queued events and
    /// activation requests
    ///
    /// Returns `None` when the component is detached or already borrowed.
    fn enter<R, F>(self: &Rc<Self>, f: F) -> Option<R>
    where
        F: FnOnce(&mut B, &mut HookContext<'_, B>) -> R,
    {
        let weak = Rc::downgrade(self);
        let mut outbox = Outbox::default();
        let result = {
            let Ok(mut doc) = self.host.doc().try_borrow_mut() else {
                tracing::warn!("document already borrowed, tabs update skipped");
                return None;
            };
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                tracing::warn!("tabs re-entered from a hook, update skipped");
                return None;
            };
            if inner.detached {
                return None;
            }
            let Inner {
                state, behavior, ..
            } = &mut *inner;
            let mut cx = HookContext {
                doc: &mut *doc,
                state,
                host: &self.host,
                weak: &weak,
                outbox: &mut outbox,
            };
            f(behavior, &mut cx)
        };
        self.flush(outbox);
        Some(result)
    }

    fn flush(self: &Rc<Self>, outbox: Outbox) {
        for event in &outbox.events {
            self.events.emit(event.name(), event);
        }
        for request in outbox.requests {
            self.activate(request);
        }
    }

    fn activate(self: &Rc<Self>, request: ActivationRequest) -> bool {
        self.enter(|behavior, cx| run_activation(behavior, cx, request))
            .unwrap_or(false)
    }
}

fn run_activation<B: TabsBehavior>(
    behavior: &mut B,
    cx: &mut HookContext<'_, B>,
    request: ActivationRequest,
) -> bool {
    let seed = IndexSet::seed(
        &request,
        cx.state.current_index,
        cx.state.panel_index,
        cx.state.end_index,
    );
    let indexes = behavior.resolve(cx, seed);

    let tab = cx.state.tabs.get(indexes.current_index).copied();
    let panel = cx.state.panels.get(indexes.panel_index).copied();
    let (Some(tab), Some(panel)) = (tab, panel) else {
        tracing::debug!(
            current = indexes.current_index,
            panel = indexes.panel_index,
            source = %request.source,
            "activation failed, no tab/panel at index"
        );
        return false;
    };
    // A failed request leaves the pending transition to settle
    if let Some(timer) = cx.state.settle_timer.take() {
        cx.scheduler().clear_timeout(timer);
    }
    let last_tab = cx.state.tabs.get(indexes.last_index).copied().unwrap_or(tab);
    let last_panel = cx
        .state
        .panels
        .get(indexes.last_panel_index)
        .copied()
        .unwrap_or(panel);

    let event = TabsEvent {
        kind: TabsEventKind::Deactivate,
        indexes,
        tab,
        panel,
        last_tab,
        last_panel,
        source: request.source,
    };

    cx.doc.set_attribute(last_tab, "tabindex", "-1");
    cx.doc.set_attribute(last_tab, "aria-selected", "false");
    cx.doc.remove_attribute(last_panel, "data-selected");
    behavior.on_deactivate(cx, &event);
    cx.outbox.events.push(event.clone());

    cx.doc.set_attribute(tab, "tabindex", "0");
    cx.doc.set_attribute(tab, "aria-selected", "true");
    cx.doc.set_attribute(panel, "data-selected", "");
    cx.state.current_index = indexes.current_index;
    cx.state.panel_index = indexes.panel_index;
    let event = event.with_kind(TabsEventKind::Activate);
    behavior.on_activate(cx, &event);
    cx.outbox.events.push(event.clone());

    tracing::debug!(
        current = indexes.current_index,
        last = indexes.last_index,
        panel = indexes.panel_index,
        source = %request.source,
        "activated"
    );

    let settled = event.with_kind(TabsEventKind::Activated);
    if request.source == Source::Init {
        settle(behavior, cx, settled);
    } else {
        let timer = cx.schedule_settle(cx.state.options.delay_ms, settled);
        cx.state.settle_timer = Some(timer);
    }
    true
}

/// Swap panel visibility and report the finished transition
fn settle<B: TabsBehavior>(behavior: &mut B, cx: &mut HookContext<'_, B>, event: TabsEvent) {
    match behavior.panel_visibility() {
        PanelVisibility::Hidden => {
            cx.doc.set_attribute(event.last_panel, "hidden", "");
            cx.doc.remove_attribute(event.panel, "hidden");
        }
        PanelVisibility::AriaHidden => {
            cx.doc.set_attribute(event.last_panel, "aria-hidden", "true");
            cx.doc.remove_attribute(event.panel, "aria-hidden");
        }
    }
    behavior.on_activated(cx, &event);
    cx.outbox.events.push(event);
}

// ============================================================================
// Public handle
// ============================================================================

/// A tabs component attached to a root element
pub struct Tabs<B: TabsBehavior> {
    shared: Rc<Shared<B>>,
}

impl<B: TabsBehavior> Tabs<B> {
    /// Discover tabs and panels under `root` and run the initial activation
    ///
    /// The initial tab is the one already `aria-selected="true"`, else the one
    /// whose `href` matches the location hash, else the first.
    pub fn attach(host: &Host, root: ElementId, behavior: B) -> Result<Self> {
        let state = {
            let mut doc = host.doc().borrow_mut();
            if !doc.contains(root) {
                return Err(SlideError::MissingElement);
            }
            let tabs = doc.query_attr(root, "role", Some("tab"));
            if tabs.is_empty() {
                return Err(SlideError::MissingRole("tab"));
            }
            let panels = doc.query_attr(root, "role", Some("tabpanel"));
            if panels.is_empty() {
                return Err(SlideError::MissingRole("tabpanel"));
            }

            let mut state = TabsState::new(root, tabs, panels, TabsOptions::from_element(&doc, root));
            let initial = initial_index(&doc, &state.tabs).min(state.end_index);
            state.current_index = initial;
            state.panel_index = initial;

            for (i, &tab) in state.tabs.iter().enumerate() {
                doc.set_attribute(tab, "data-index", i.to_string());
                doc.set_attribute(tab, "tabindex", "-1");
                doc.set_attribute(tab, "aria-selected", "false");
            }
            state
        };

        let shared = Rc::new(Shared {
            host: host.clone(),
            events: EventBus::new(),
            inner: RefCell::new(Inner {
                state,
                behavior,
                detached: false,
            }),
        });

        shared
            .enter(|behavior, cx| {
                behavior.init(cx)?;
                let visibility = behavior.panel_visibility();
                for &panel in &cx.state.panels {
                    cx.doc.remove_attribute(panel, "data-selected");
                    match visibility {
                        PanelVisibility::Hidden => cx.doc.set_attribute(panel, "hidden", ""),
                        PanelVisibility::AriaHidden => {
                            cx.doc.set_attribute(panel, "aria-hidden", "true")
                        }
                    }
                }
                Ok(())
            })
            .unwrap_or(Err(SlideError::MissingElement))?;

        let initial = shared.inner.borrow().state.current_index;
        if !shared.activate(ActivationRequest::new(initial, Source::Init)) {
            return Err(SlideError::InitialActivation(initial));
        }

        tracing::debug!(initial, "tabs attached");
        Ok(Self { shared })
    }

    /// Run a transition; `false` (with nothing changed) when the resolved
    /// tab or panel does not exist
    pub fn activate(&self, request: ActivationRequest) -> bool {
        self.shared.activate(request)
    }

    /// Keyboard navigation; returns whether the key was handled
    ///
    /// Moves focus to the newly selected tab.
    pub fn handle_key(&self, key: &str) -> bool {
        let Some(key) = Key::from_name(key) else {
            return false;
        };
        let Some(request) = keyboard_request(&self.shared.inner.borrow().state, key) else {
            return false;
        };
        if !self.shared.activate(request) {
            return false;
        }
        let tab = self.current_tab();
        if let (Some(tab), Ok(mut doc)) = (tab, self.shared.host.doc().try_borrow_mut()) {
            doc.focus(tab);
        }
        true
    }

    /// Activate the tab that contains `target`
    pub fn handle_click(&self, target: ElementId) -> bool {
        let index = {
            let doc = self.shared.host.doc().borrow();
            let inner = self.shared.inner.borrow();
            let tab = inner
                .state
                .tabs
                .iter()
                .copied()
                .find(|&tab| tab == target || doc.is_ancestor(tab, target));
            tab.and_then(|tab| doc.get_attribute(tab, "data-index"))
                .and_then(|value| value.parse::<usize>().ok())
        };
        match index {
            Some(index) => self.shared.activate(ActivationRequest::click(index)),
            None => false,
        }
    }

    /// Run `f` with the behavior and a hook context, then flush events
    ///
    /// Entry point for behavior-specific input handlers.
    pub fn dispatch<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut B, &mut HookContext<'_, B>) -> R,
    {
        self.shared.enter(f)
    }

    /// Read the behavior
    pub fn behavior<R>(&self, f: impl FnOnce(&B) -> R) -> R {
        f(&self.shared.inner.borrow().behavior)
    }

    pub fn subscribe<F>(&self, name: &'static str, callback: F) -> ListenerId
    where
        F: Fn(&TabsEvent) + 'static,
    {
        self.shared.events.subscribe(name, callback)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.events.unsubscribe(id)
    }

    pub fn events(&self) -> &EventBus<TabsEvent> {
        &self.shared.events
    }

    pub fn host(&self) -> &Host {
        &self.shared.host
    }

    pub fn root(&self) -> ElementId {
        self.shared.inner.borrow().state.root
    }

    pub fn current_index(&self) -> usize {
        self.shared.inner.borrow().state.current_index
    }

    pub fn panel_index(&self) -> usize {
        self.shared.inner.borrow().state.panel_index
    }

    pub fn end_index(&self) -> usize {
        self.shared.inner.borrow().state.end_index
    }

    pub fn tabs(&self) -> Vec<ElementId> {
        self.shared.inner.borrow().state.tabs.clone()
    }

    pub fn panels(&self) -> Vec<ElementId> {
        self.shared.inner.borrow().state.panels.clone()
    }

    pub fn current_tab(&self) -> Option<ElementId> {
        let inner = self.shared.inner.borrow();
        inner.state.tabs.get(inner.state.current_index).copied()
    }

    pub fn current_panel(&self) -> Option<ElementId> {
        let inner = self.shared.inner.borrow();
        inner.state.panels.get(inner.state.panel_index).copied()
    }

    /// Whether a transition is waiting for its settle delay
    pub fn is_settling(&self) -> bool {
        self.shared.inner.borrow().state.settle_timer.is_some()
    }

    pub fn is_detached(&self) -> bool {
        self.shared.inner.borrow().detached
    }

    /// Cancel pending work, release behavior resources and drop listeners
    pub fn detach(&self) {
        if self.is_detached() {
            return;
        }
        self.shared.enter(|behavior, cx| {
            if let Some(timer) = cx.state.settle_timer.take() {
                cx.scheduler().clear_timeout(timer);
            }
            behavior.detach(cx);
        });
        if let Ok(mut inner) = self.shared.inner.try_borrow_mut() {
            inner.detached = true;
        }
        self.shared.events.clear();
        tracing::debug!("tabs detached");
    }
}

impl<B: TabsBehavior> Drop for Tabs<B> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<B: TabsBehavior> std::fmt::Debug for Tabs<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.borrow();
        f.debug_struct("Tabs")
            .field("current_index", &inner.state.current_index)
            .field("panel_index", &inner.state.panel_index)
            .field("end_index", &inner.state.end_index)
            .field("detached", &inner.detached)
            .finish()
    }
}

fn initial_index(doc: &Document, tabs: &[ElementId]) -> usize {
    let selected = tabs
        .iter()
        .position(|&tab| doc.get_attribute(tab, "aria-selected") == Some("true"));
    let linked = || {
        let hash = doc.location_hash();
        if hash.is_empty() {
            return None;
        }
        tabs.iter()
            .position(|&tab| doc.get_attribute(tab, "href") == Some(hash))
    };
    selected.or_else(linked).unwrap_or(0)
}

fn keyboard_request(state: &TabsState, key: Key) -> Option<ActivationRequest> {
    let (previous, next) = match state.options.direction {
        Direction::Horizontal => (Key::ArrowLeft, Key::ArrowRight),
        Direction::Vertical => (Key::ArrowUp, Key::ArrowDown),
    };
    let current = state.current_index as isize;
    let end = state.end_index as isize;
    let raw = match key {
        Key::Home => 0,
        Key::End => end,
        k if k == previous => current - 1,
        k if k == next => current + 1,
        _ => return None,
    };
    let wrapped = if raw < 0 {
        end
    } else if raw > end {
        0
    } else {
        raw
    };
    Some(ActivationRequest::new(wrapped as usize, Source::Click).with_raw(raw))
}

/// Plain tabs component
pub type PlainTabs = Tabs<TabPanels>;

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::{ACTIVATE, ACTIVATED, DEACTIVATE};
    use crate::testing::Fixture;

    fn record(tabs: &PlainTabs) -> Rc<RefCell<Vec<(&'static str, usize)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in [DEACTIVATE, ACTIVATE, ACTIVATED] {
            let log = Rc::clone(&log);
            tabs.subscribe(name, move |event| {
                log.borrow_mut().push((event.name(), event.indexes.current_index));
            });
        }
        log
    }

    #[test]
    fn test_attach_selects_first_tab() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();

        assert_eq!(tabs.current_index(), 0);
        assert_eq!(tabs.end_index(), 2);
        assert_eq!(fx.attribute(fx.tabs[0], "aria-selected").as_deref(), Some("true"));
        assert_eq!(fx.attribute(fx.tabs[0], "tabindex").as_deref(), Some("0"));
        assert_eq!(fx.attribute(fx.tabs[1], "tabindex").as_deref(), Some("-1"));
        assert_eq!(fx.attribute(fx.tabs[2], "data-index").as_deref(), Some("2"));
        assert!(!fx.has_attribute(fx.panels[0], "hidden"));
        assert!(fx.has_attribute(fx.panels[0], "data-selected"));
        assert!(fx.has_attribute(fx.panels[1], "hidden"));
        assert!(fx.has_attribute(fx.panels[2], "hidden"));
        assert!(!tabs.is_settling());
    }

    #[test]
    fn test_initial_index_prefers_selected_then_hash() {
        let fx = Fixture::builder(4).selected(2).hash("#panel-3").build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        assert_eq!(tabs.current_index(), 2);

        let fx = Fixture::builder(4).hash("#panel-3").build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        assert_eq!(tabs.current_index(), 3);

        let fx = Fixture::builder(4).hash("#nothing").build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        assert_eq!(tabs.current_index(), 0);
    }

    #[test]
    fn test_attach_without_roles_fails() {
        let fx = Fixture::builder(0).build();
        let err = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap_err();
        assert_eq!(err, SlideError::MissingRole("tab"));
    }

    #[test]
    fn test_event_order_and_settle_delay() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);

        assert!(tabs.activate(ActivationRequest::click(2)));
        assert_eq!(*log.borrow(), vec![(DEACTIVATE, 2), (ACTIVATE, 2)]);
        assert!(tabs.is_settling());
        // Old panel stays visible until the delay passes
        assert!(!fx.has_attribute(fx.panels[0], "hidden"));
        assert!(fx.has_attribute(fx.panels[0], "inert"));
        assert!(fx.has_attribute(fx.panels[2], "data-selected"));
        assert!(!fx.has_attribute(fx.panels[0], "data-selected"));

        fx.scheduler.advance(299.0);
        assert_eq!(log.borrow().len(), 2);
        fx.scheduler.advance(1.0);
        assert_eq!(log.borrow().last(), Some(&(ACTIVATED, 2)));
        assert!(fx.has_attribute(fx.panels[0], "hidden"));
        assert!(!fx.has_attribute(fx.panels[2], "hidden"));
        assert!(!tabs.is_settling());
    }

    #[test]
    fn test_new_activation_cancels_pending_settle() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);

        tabs.activate(ActivationRequest::click(1));
        fx.scheduler.advance(100.0);
        tabs.activate(ActivationRequest::click(2));
        fx.scheduler.advance(1000.0);

        let settled: Vec<_> = log
            .borrow()
            .iter()
            .filter(|(name, _)| *name == ACTIVATED)
            .copied()
            .collect();
        assert_eq!(settled, vec![(ACTIVATED, 2)]);
    }

    #[test]
    fn test_out_of_range_fails_without_mutation() {
        let fx = Fixture::builder(3).selected(1).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);

        // Plain tabs clamp, so break the pairing by dropping panels
        tabs.dispatch(|_, cx| cx.state.set_panels(Vec::new()));
        assert!(!tabs.activate(ActivationRequest::click(0)));
        assert!(log.borrow().is_empty());
        assert_eq!(tabs.current_index(), 1);
        assert_eq!(fx.attribute(fx.tabs[1], "aria-selected").as_deref(), Some("true"));
    }

    #[test]
    fn test_failed_activation_keeps_pending_settle() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);

        assert!(tabs.activate(ActivationRequest::click(1)));
        tabs.dispatch(|_, cx| cx.state.set_panels(fx.panels[..2].to_vec()));
        assert!(!tabs.activate(ActivationRequest::click(2)));
        assert!(tabs.is_settling());

        fx.scheduler.advance(300.0);
        assert!(!tabs.is_settling());
        assert!(fx.has_attribute(fx.panels[0], "hidden"));
        assert!(!fx.has_attribute(fx.panels[1], "hidden"));
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(log.borrow().last(), Some(&(ACTIVATED, 1)));
    }

    #[test]
    fn test_reactivating_current_reemits() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);
        let children_before = fx.host.doc().borrow().children(fx.track).len();

        assert!(tabs.activate(ActivationRequest::click(0)));
        fx.scheduler.advance(300.0);
        assert_eq!(log.borrow().len(), 3);
        assert!(!fx.has_attribute(fx.panels[0], "hidden"));
        assert!(!fx.has_attribute(fx.panels[0], "inert"));
        assert_eq!(fx.host.doc().borrow().children(fx.track).len(), children_before);
    }

    #[test]
    fn test_keyboard_wraps_and_focuses() {
        let fx = Fixture::builder(4).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();

        assert!(tabs.handle_key("ArrowLeft"));
        assert_eq!(tabs.current_index(), 3);
        assert_eq!(fx.host.doc().borrow().active_element(), Some(fx.tabs[3]));

        assert!(tabs.handle_key("Right"));
        assert_eq!(tabs.current_index(), 0);
        assert!(tabs.handle_key("End"));
        assert_eq!(tabs.current_index(), 3);
        assert!(tabs.handle_key("Home"));
        assert_eq!(tabs.current_index(), 0);

        // Vertical keys do nothing on a horizontal list
        assert!(!tabs.handle_key("ArrowDown"));
        assert!(!tabs.handle_key("q"));
    }

    #[test]
    fn test_keyboard_vertical_direction() {
        let fx = Fixture::builder(3).attr("direction", "vertical").build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        assert!(!tabs.handle_key("ArrowRight"));
        assert!(tabs.handle_key("ArrowDown"));
        assert_eq!(tabs.current_index(), 1);
        assert!(tabs.handle_key("ArrowUp"));
        assert_eq!(tabs.current_index(), 0);
    }

    #[test]
    fn test_keyboard_passes_raw_index() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let raw = Rc::new(RefCell::new(None));
        let seen = Rc::clone(&raw);
        tabs.subscribe(ACTIVATE, move |event| *seen.borrow_mut() = event.indexes.raw_index);

        tabs.handle_key("ArrowLeft");
        assert_eq!(*raw.borrow(), Some(-1));
        assert_eq!(tabs.current_index(), 2);
    }

    #[test]
    fn test_click_reads_stored_ordinal() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let label = fx.host.doc().borrow_mut().append_new(fx.tabs[2], "span");

        assert!(tabs.handle_click(label));
        assert_eq!(tabs.current_index(), 2);
        assert!(!tabs.handle_click(fx.track));
    }

    #[test]
    fn test_listener_can_reenter() {
        let fx = Fixture::builder(3).build();
        let tabs = Rc::new(PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap());
        let weak = Rc::downgrade(&tabs);
        tabs.subscribe(ACTIVATE, move |event| {
            if event.indexes.current_index == 1 {
                if let Some(tabs) = weak.upgrade() {
                    tabs.activate(ActivationRequest::click(2));
                }
            }
        });

        tabs.activate(ActivationRequest::click(1));
        assert_eq!(tabs.current_index(), 2);
    }

    #[test]
    fn test_detach_clears_timers_and_listeners() {
        let fx = Fixture::builder(3).build();
        let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
        let log = record(&tabs);

        tabs.activate(ActivationRequest::click(1));
        tabs.detach();
        assert!(fx.scheduler.is_idle());
        assert!(!tabs.activate(ActivationRequest::click(2)));
        assert_eq!(tabs.events().listener_count(ACTIVATE), 0);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_drop_cancels_settle() {
        let fx = Fixture::builder(3).build();
        {
            let tabs = PlainTabs::attach(&fx.host, fx.root, TabPanels).unwrap();
            tabs.activate(ActivationRequest::click(1));
            assert_eq!(fx.scheduler.pending_timers(), 1);
        }
        assert_eq!(fx.scheduler.pending_timers(), 0);
    }
}
