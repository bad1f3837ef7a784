//! Document fixtures for component tests

use slidekit_animation::Scheduler;
use slidekit_core::{Config, Document, ElementId};

use crate::breakpoints::PanelGroup;
use crate::host::Host;

pub(crate) const ITEM_WIDTH: f32 = 100.0;

/// root > (tablist > tab*) + (track > panel* > item)
pub(crate) struct Fixture {
    pub host: Host,
    pub scheduler: Scheduler,
    pub root: ElementId,
    pub tabs: Vec<ElementId>,
    pub track: ElementId,
    pub panels: Vec<ElementId>,
    pub items: Vec<ElementId>,
}

pub(crate) struct FixtureBuilder {
    count: usize,
    attributes: Vec<(String, String)>,
    panel_widths: Option<Vec<f32>>,
    track_width: f32,
    viewport_width: f32,
    config: Config,
    selected: Option<usize>,
    hash: Option<String>,
    with_track: bool,
}

impl Fixture {
    pub fn builder(count: usize) -> FixtureBuilder {
        FixtureBuilder {
            count,
            attributes: Vec::new(),
            panel_widths: None,
            track_width: ITEM_WIDTH,
            viewport_width: 1024.0,
            config: Config::default(),
            selected: None,
            hash: None,
            with_track: true,
        }
    }

    pub fn group(&self) -> PanelGroup<'_> {
        PanelGroup {
            tabs: &self.tabs,
            panels: &self.panels,
            items: &self.items,
        }
    }

    pub fn scroll_left(&self) -> f32 {
        self.host.doc().borrow().scroll_left(self.track)
    }

    pub fn set_scroll_left(&self, value: f32) -> f32 {
        self.host.doc().borrow_mut().set_scroll_left(self.track, value)
    }

    pub fn set_viewport_width(&self, width: f32) {
        self.host.doc().borrow_mut().set_viewport_width(width);
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.host
            .doc()
            .borrow()
            .get_attribute(id, name)
            .map(str::to_string)
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.host.doc().borrow().has_attribute(id, name)
    }
}

impl FixtureBuilder {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Fixed panel widths (flex layouts); panels otherwise size to content
    pub fn panel_widths(mut self, widths: &[f32]) -> Self {
        self.panel_widths = Some(widths.to_vec());
        self
    }

    pub fn track_width(mut self, width: f32) -> Self {
        self.track_width = width;
        self
    }

    pub fn viewport(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn hash(mut self, hash: &str) -> Self {
        self.hash = Some(hash.to_string());
        self
    }

    pub fn without_track(mut self) -> Self {
        self.with_track = false;
        self
    }

    pub fn build(self) -> Fixture {
        let mut doc = Document::new();
        doc.set_viewport_width(self.viewport_width);
        if let Some(hash) = &self.hash {
            doc.set_location_hash(hash.as_str());
        }

        let root = doc.append_new(doc.body(), "div");
        for (name, value) in &self.attributes {
            doc.set_attribute(root, name, value.as_str());
        }

        let tablist = doc.append_new(root, "div");
        doc.set_attribute(tablist, "role", "tablist");
        let track = doc.append_new(root, "div");
        if self.with_track {
            doc.set_attribute(track, "data-track", "");
        }
        doc.set_width(track, self.track_width);

        let mut tabs = Vec::with_capacity(self.count);
        let mut panels = Vec::with_capacity(self.count);
        let mut items = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let tab = doc.append_new(tablist, "a");
            doc.set_attribute(tab, "role", "tab");
            doc.set_attribute(tab, "href", format!("#panel-{i}"));
            if self.selected == Some(i) {
                doc.set_attribute(tab, "aria-selected", "true");
            }
            tabs.push(tab);

            let panel = doc.append_new(track, "section");
            doc.set_attribute(panel, "role", "tabpanel");
            doc.set_attribute(panel, "id", format!("panel-{i}"));
            if let Some(width) = self.panel_widths.as_ref().and_then(|w| w.get(i)) {
                doc.set_width(panel, *width);
            }
            panels.push(panel);

            let item = doc.append_new(panel, "div");
            doc.set_attribute(item, "data-item", i.to_string());
            if self.panel_widths.is_none() {
                doc.set_width(item, ITEM_WIDTH);
            }
            let link = doc.append_new(item, "a");
            doc.set_attribute(link, "href", format!("#item-{i}"));
            items.push(item);
        }

        let scheduler = Scheduler::new();
        let host = Host::with_config(doc.into_shared(), scheduler.clone(), self.config);
        Fixture {
            host,
            scheduler,
            root,
            tabs,
            track,
            panels,
            items,
        }
    }
}
