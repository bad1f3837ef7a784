//! Keyboard reachability helpers
//!
//! Off-screen slider panels stay in the layout, so their controls must be
//! taken out of the tab order explicitly. Disabling stores the author's
//! `tabindex` so enabling can put it back.

use crate::dom::{Document, ElementId};

const SAVED_TABINDEX: &str = "data-saved-tabindex";

const FOCUSABLE_TAGS: &[&str] = &["button", "input", "select", "textarea", "iframe", "summary"];

/// Whether the element can take keyboard focus (ignoring current tab order)
pub fn is_focusable(doc: &Document, id: ElementId) -> bool {
    if doc.has_attribute(id, "tabindex") || doc.has_attribute(id, SAVED_TABINDEX) {
        return true;
    }
    match doc.tag(id) {
        Some("a") => doc.has_attribute(id, "href"),
        Some(tag) => FOCUSABLE_TAGS.contains(&tag) && !doc.has_attribute(id, "disabled"),
        None => false,
    }
}

/// Focusable descendants of `root`, in document order
pub fn focusable_items(doc: &Document, root: ElementId) -> Vec<ElementId> {
    doc.query_all(root, is_focusable)
}

/// Put `items` into (`enable`) or take them out of the tab order
pub fn toggle_focusability(doc: &mut Document, items: &[ElementId], enable: bool) {
    for &id in items {
        if enable {
            match doc.get_attribute(id, SAVED_TABINDEX).map(str::to_string) {
                Some(saved) if saved.is_empty() => doc.remove_attribute(id, "tabindex"),
                Some(saved) => doc.set_attribute(id, "tabindex", saved),
                None => {
                    if doc.get_attribute(id, "tabindex") == Some("-1") {
                        doc.remove_attribute(id, "tabindex");
                    }
                }
            }
            doc.remove_attribute(id, SAVED_TABINDEX);
        } else {
            if !doc.has_attribute(id, SAVED_TABINDEX) {
                let saved = doc.get_attribute(id, "tabindex").unwrap_or("").to_string();
                doc.set_attribute(id, SAVED_TABINDEX, saved);
            }
            doc.set_attribute(id, "tabindex", "-1");
        }
    }
}

/// Whether the element is currently reachable with the Tab key
pub fn is_tabbable(doc: &Document, id: ElementId) -> bool {
    is_focusable(doc, id) && doc.get_attribute(id, "tabindex") != Some("-1")
}
