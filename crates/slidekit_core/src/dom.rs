//! Retained element tree
//!
//! A small document model with just enough of the browser DOM for the
//! components: ordered attributes, inline style properties, parent/child
//! links, a one-axis flow layout and per-element scroll offsets.
//!
//! # Layout
//!
//! Children are laid out left to right starting at the parent's
//! `padding-left`. An element carrying the `hidden` attribute takes no space.
//! An element without an explicit width is as wide as its displayed children
//! (content width). Scroll offsets are clamped to
//! `[0, scroll_width - client_width]`.
//!
//! # Example
//!
//! ```rust
//! use slidekit_core::dom::Document;
//!
//! let mut doc = Document::new();
//! let track = doc.append_new(doc.body(), "div");
//! doc.set_width(track, 100.0);
//! for _ in 0..3 {
//!     let panel = doc.append_new(track, "section");
//!     doc.set_width(panel, 100.0);
//! }
//! assert_eq!(doc.scroll_width(track), 300.0);
//! assert_eq!(doc.set_scroll_left(track, 500.0), 200.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to an element in a [`Document`]
    pub struct ElementId;
}

/// A document shared between the components and the host
pub type SharedDocument = Rc<RefCell<Document>>;

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    styles: FxHashMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Explicit width; `None` means content width
    width: Option<f32>,
    scroll_left: f32,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            styles: FxHashMap::default(),
            parent: None,
            children: Vec::new(),
            width: None,
            scroll_left: 0.0,
        }
    }
}

/// Element arena plus window-level state (viewport width, location hash)
#[derive(Clone, Debug)]
pub struct Document {
    nodes: SlotMap<ElementId, Node>,
    body: ElementId,
    viewport_width: f32,
    location_hash: String,
    active_element: Option<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Self {
            nodes,
            body,
            viewport_width: 1024.0,
            location_hash: String::new(),
            active_element: None,
        }
    }

    /// Wrap in `Rc<RefCell<_>>` for sharing with components
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Node::new(tag))
    }

    /// Create an element and append it to `parent`
    pub fn append_new(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children
    pub fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Move `child` into `parent` before `reference` (or at the end)
    ///
    /// The child is detached from its previous parent first. Fails if either
    /// element is missing, if `reference` is not a child of `parent`, or if the
    /// move would create a cycle.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return false;
        }
        if reference == Some(child) {
            return true;
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return false;
            }
        }

        self.detach(child);

        let position = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or_else(|| self.children(parent).len());
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(position, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Detach from the parent, keeping the subtree alive
    pub fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Destroy an element and its subtree
    pub fn remove(&mut self, id: ElementId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// Pre-order descendants, excluding `root`
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendants of `root` matching `predicate`, in document order
    pub fn query_all<F>(&self, root: ElementId, predicate: F) -> Vec<ElementId>
    where
        F: Fn(&Document, ElementId) -> bool,
    {
        self.descendants(root)
            .into_iter()
            .filter(|&id| predicate(self, id))
            .collect()
    }

    /// Descendants carrying attribute `name` (with `value`, if given)
    pub fn query_attr(&self, root: ElementId, name: &str, value: Option<&str>) -> Vec<ElementId> {
        self.query_all(root, |doc, id| match (doc.get_attribute(id, name), value) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// First element in the document with the given `id` attribute
    pub fn find_by_id(&self, id_attr: &str) -> Option<ElementId> {
        self.query_attr(self.body, "id", Some(id_attr)).into_iter().next()
    }

    /// Copy `id` and its subtree into a new detached element
    pub fn deep_clone(&mut self, id: ElementId) -> Option<ElementId> {
        let node = self.nodes.get(id)?.clone();
        let copy = self.nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            ..node.clone()
        });
        for child in node.children {
            if let Some(child_copy) = self.deep_clone(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn get_attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.shift_remove(name);
        }
    }

    /// Set an empty boolean attribute when `on`, remove it otherwise
    pub fn toggle_attribute(&mut self, id: ElementId, name: &str, on: bool) {
        if on {
            self.set_attribute(id, name, "");
        } else {
            self.remove_attribute(id, name);
        }
    }

    // =========================================================================
    // Inline styles
    // =========================================================================

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.styles.insert(property.to_string(), value.into());
        }
    }

    pub fn remove_style(&mut self, id: ElementId, property: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.styles.remove(property);
        }
    }

    /// Numeric value of a pixel style (`"12px"` or `"12"`), 0 when unset
    pub fn style_px(&self, id: ElementId, property: &str) -> f32 {
        self.style(id, property)
            .map(|v| v.trim().trim_end_matches("px").trim())
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn set_width(&mut self, id: ElementId, width: f32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.width = Some(width.max(0.0));
        }
    }

    /// Fall back to content width
    pub fn clear_width(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.width = None;
        }
    }

    pub fn is_displayed(&self, id: ElementId) -> bool {
        self.contains(id) && !self.has_attribute(id, "hidden")
    }

    /// Laid-out width (0 for hidden or missing elements)
    pub fn width(&self, id: ElementId) -> f32 {
        if !self.is_displayed(id) {
            return 0.0;
        }
        match self.nodes[id].width {
            Some(width) => width,
            None => self.content_width(id),
        }
    }

    pub fn client_width(&self, id: ElementId) -> f32 {
        self.width(id)
    }

    fn content_width(&self, id: ElementId) -> f32 {
        self.style_px(id, "padding-left")
            + self
                .children(id)
                .iter()
                .map(|&child| self.width(child))
                .sum::<f32>()
    }

    /// Left edge relative to the parent's border box
    pub fn offset_left(&self, id: ElementId) -> f32 {
        let Some(parent) = self.parent(id) else {
            return 0.0;
        };
        let mut left = self.style_px(parent, "padding-left");
        for &sibling in self.children(parent) {
            if sibling == id {
                break;
            }
            left += self.width(sibling);
        }
        left
    }

    pub fn scroll_width(&self, id: ElementId) -> f32 {
        self.client_width(id).max(self.content_width(id))
    }

    pub fn max_scroll_left(&self, id: ElementId) -> f32 {
        (self.scroll_width(id) - self.client_width(id)).max(0.0)
    }

    pub fn scroll_left(&self, id: ElementId) -> f32 {
        self.nodes.get(id).map(|n| n.scroll_left).unwrap_or(0.0)
    }

    /// Set the scroll offset, clamped to the scrollable range; returns the
    /// applied value
    pub fn set_scroll_left(&mut self, id: ElementId, value: f32) -> f32 {
        let max = self.max_scroll_left(id);
        let applied = if value.is_finite() { value.clamp(0.0, max) } else { 0.0 };
        if let Some(node) = self.nodes.get_mut(id) {
            node.scroll_left = applied;
        }
        applied
    }

    // =========================================================================
    // Window
    // =========================================================================

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(0.0);
    }

    /// Current fragment including the leading `#`, or empty
    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    pub fn set_location_hash(&mut self, hash: impl Into<String>) {
        self.location_hash = hash.into();
    }

    /// Move keyboard focus; fails for missing or hidden elements
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.is_displayed(id) {
            return false;
        }
        self.active_element = Some(id);
        true
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active_element.filter(|&id| self.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(doc: &mut Document, widths: &[f32]) -> (ElementId, Vec<ElementId>) {
        let parent = doc.append_new(doc.body(), "div");
        let children = widths
            .iter()
            .map(|&w| {
                let child = doc.append_new(parent, "div");
                doc.set_width(child, w);
                child
            })
            .collect();
        (parent, children)
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut doc = Document::new();
        let (a, children) = row(&mut doc, &[10.0, 20.0]);
        let b = doc.append_new(doc.body(), "div");

        assert!(doc.append_child(b, children[0]));
        assert_eq!(doc.children(a), &[children[1]]);
        assert_eq!(doc.children(b), &[children[0]]);
        assert_eq!(doc.parent(children[0]), Some(b));
    }

    #[test]
    fn test_insert_before_and_cycles() {
        let mut doc = Document::new();
        let (parent, children) = row(&mut doc, &[1.0, 1.0, 1.0]);

        assert!(doc.insert_before(parent, children[2], Some(children[0])));
        assert_eq!(doc.children(parent), &[children[2], children[0], children[1]]);

        // Parent cannot move under its own child
        assert!(!doc.append_child(children[0], parent));
        // Reference must belong to the parent
        let stray = doc.create_element("div");
        assert!(!doc.insert_before(parent, children[0], Some(stray)));
    }

    #[test]
    fn test_deep_clone_is_detached_copy() {
        let mut doc = Document::new();
        let (parent, children) = row(&mut doc, &[5.0, 7.0]);
        doc.set_attribute(parent, "id", "track");
        doc.set_attribute(children[1], "data-x", "1");

        let copy = doc.deep_clone(parent).unwrap();
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.children(copy).len(), 2);
        assert_eq!(doc.get_attribute(copy, "id"), Some("track"));
        assert_eq!(doc.get_attribute(doc.children(copy)[1], "data-x"), Some("1"));
        assert_ne!(doc.children(copy)[0], children[0]);
        // Original untouched
        assert_eq!(doc.children(parent), children.as_slice());
    }

    #[test]
    fn test_flow_layout_skips_hidden() {
        let mut doc = Document::new();
        let (parent, children) = row(&mut doc, &[100.0, 50.0, 25.0]);
        doc.set_style(parent, "padding-left", "10px");

        assert_eq!(doc.offset_left(children[0]), 10.0);
        assert_eq!(doc.offset_left(children[2]), 160.0);

        doc.toggle_attribute(children[1], "hidden", true);
        assert_eq!(doc.width(children[1]), 0.0);
        assert_eq!(doc.offset_left(children[2]), 110.0);
        // Content width
        assert_eq!(doc.width(parent), 135.0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut doc = Document::new();
        let (parent, _) = row(&mut doc, &[100.0, 100.0, 100.0]);
        doc.set_width(parent, 100.0);

        assert_eq!(doc.max_scroll_left(parent), 200.0);
        assert_eq!(doc.set_scroll_left(parent, -5.0), 0.0);
        assert_eq!(doc.set_scroll_left(parent, 150.0), 150.0);
        assert_eq!(doc.set_scroll_left(parent, 900.0), 200.0);
        assert_eq!(doc.scroll_left(parent), 200.0);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut doc = Document::new();
        let before = doc.len();
        let (parent, children) = row(&mut doc, &[1.0, 1.0]);
        doc.remove(parent);
        assert_eq!(doc.len(), before);
        assert!(!doc.contains(children[0]));
    }

    #[test]
    fn test_style_px_parsing() {
        let mut doc = Document::new();
        let el = doc.append_new(doc.body(), "div");
        doc.set_style(el, "scroll-padding-left", "24px");
        assert_eq!(doc.style_px(el, "scroll-padding-left"), 24.0);
        doc.set_style(el, "scroll-padding-left", "auto");
        assert_eq!(doc.style_px(el, "scroll-padding-left"), 0.0);
    }

    #[test]
    fn test_focus_skips_hidden_elements() {
        let mut doc = Document::new();
        let a = doc.append_new(doc.body(), "button");
        let b = doc.append_new(doc.body(), "button");
        doc.set_attribute(b, "hidden", "");

        assert!(doc.focus(a));
        assert!(!doc.focus(b));
        assert_eq!(doc.active_element(), Some(a));

        doc.remove(a);
        assert_eq!(doc.active_element(), None);
    }
}
