//! Breakpoint regrouping
//!
//! A breakpoint maps a viewport width range to a number of items per panel.
//! Regrouping deals the flat item list into panels in contiguous chunks and
//! hides the tabs and panels that end up empty.
//!
//! ```ignore
//! let breakpoints = Breakpoints::parse("0,600,900,1200", "1,2,3,4", 7)?;
//! let mut regrouper = Regrouper::new(breakpoints);
//! let layout = regrouper.move_groups(&mut doc, 1300.0, &config, &[group]);
//! assert_eq!(layout.map(|l| l.end_index()), Some(1));
//! ```

use serde::Serialize;
use slidekit_core::{Config, Document, ElementId, Result, SlideError};

use crate::options::parse_number_list;

/// One width range
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Breakpoint {
    /// Inclusive lower bound in unscaled px
    pub low: f32,
    /// Exclusive upper bound; infinite for the last range
    pub high: f32,
    pub items_per_panel: usize,
    pub panel_count: usize,
}

impl Breakpoint {
    pub fn contains(&self, width: f32, config: &Config) -> bool {
        width >= config.scale_px(self.low) && width < config.scale_px(self.high)
    }
}

/// Ranges covering `[0, ∞)` in ascending order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Breakpoints {
    entries: Vec<Breakpoint>,
}

impl Breakpoints {
    /// Build from the `breakpoints` and `visible` attribute lists
    ///
    /// Pairs with a malformed width or a visible count below one are skipped.
    /// Widths are sorted, repeated widths keep their first pairing, and the
    /// lowest range is widened down to 0.
    pub fn parse(breakpoints: &str, visible: &str, total_items: usize) -> Result<Self> {
        let mut pairs: Vec<(f32, usize)> = parse_number_list(breakpoints)
            .into_iter()
            .zip(parse_number_list(visible))
            .filter_map(|pair| match pair {
                (Some(low), Some(count)) if low >= 0.0 && count >= 1.0 => {
                    Some((low, count.floor() as usize))
                }
                _ => None,
            })
            .collect();

        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs.dedup_by(|later, earlier| later.0 == earlier.0);

        if pairs.is_empty() {
            return Err(SlideError::EmptyBreakpoints {
                breakpoints: breakpoints.to_string(),
                visible: visible.to_string(),
            });
        }

        let entries = pairs
            .iter()
            .enumerate()
            .map(|(i, &(low, items_per_panel))| Breakpoint {
                low: if i == 0 { 0.0 } else { low },
                high: pairs.get(i + 1).map_or(f32::INFINITY, |next| next.0),
                items_per_panel,
                panel_count: total_items.div_ceil(items_per_panel).max(1),
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Breakpoint] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Breakpoint> {
        self.entries.get(index)
    }

    /// Index of the range holding `width`
    pub fn find(&self, width: f32, config: &Config) -> usize {
        self.entries
            .iter()
            .position(|bp| bp.contains(width, config))
            .unwrap_or(0)
    }
}

/// Tabs, panels and items regrouped together (one loop copy)
#[derive(Clone, Copy, Debug)]
pub struct PanelGroup<'a> {
    pub tabs: &'a [ElementId],
    pub panels: &'a [ElementId],
    pub items: &'a [ElementId],
}

/// Result of a regroup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GroupLayout {
    pub breakpoint: usize,
    pub items_per_panel: usize,
    /// Visible panels (never more than exist)
    pub panel_count: usize,
}

impl GroupLayout {
    pub fn end_index(&self) -> usize {
        self.panel_count.saturating_sub(1)
    }
}

/// Applies breakpoints to the document, remembering the active range
#[derive(Clone, Debug)]
pub struct Regrouper {
    breakpoints: Breakpoints,
    active: Option<GroupLayout>,
}

impl Regrouper {
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            active: None,
        }
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Layout from the last regroup
    pub fn layout(&self) -> Option<GroupLayout> {
        self.active
    }

    /// Regroup every group for `width`
    ///
    /// Returns `None` without touching the document when `width` falls in the
    /// range that is already applied.
    pub fn move_groups(
        &mut self,
        doc: &mut Document,
        width: f32,
        config: &Config,
        groups: &[PanelGroup<'_>],
    ) -> Option<GroupLayout> {
        let index = self.breakpoints.find(width, config);
        if self.active.is_some_and(|layout| layout.breakpoint == index) {
            tracing::trace!(width, breakpoint = index, "regroup skipped, range unchanged");
            return None;
        }
        let breakpoint = *self.breakpoints.get(index)?;

        for group in groups {
            distribute(doc, group, &breakpoint);
        }

        let available = groups.first().map_or(0, |group| group.panels.len());
        let layout = GroupLayout {
            breakpoint: index,
            items_per_panel: breakpoint.items_per_panel,
            panel_count: breakpoint.panel_count.min(available),
        };
        tracing::debug!(
            width,
            breakpoint = index,
            items_per_panel = layout.items_per_panel,
            panel_count = layout.panel_count,
            "regrouped panels"
        );
        self.active = Some(layout);
        Some(layout)
    }
}

/// Deal `group.items` into its panels per `breakpoint`
fn distribute(doc: &mut Document, group: &PanelGroup<'_>, breakpoint: &Breakpoint) {
    let panel_count = breakpoint.panel_count.min(group.panels.len());
    for (i, &tab) in group.tabs.iter().enumerate() {
        doc.toggle_attribute(tab, "hidden", i >= panel_count);
    }
    for (i, &panel) in group.panels.iter().enumerate() {
        doc.toggle_attribute(panel, "hidden", i >= panel_count);
    }

    let Some(&first) = group.panels.first() else {
        return;
    };
    let Some(parent) = doc.parent(first) else {
        return;
    };

    // Reinsert before whatever followed the block
    let last = group
        .panels
        .iter()
        .filter_map(|&panel| doc.index_in_parent(panel))
        .max();
    let anchor = last.and_then(|i| {
        doc.children(parent)
            .get(i + 1..)
            .and_then(|rest| rest.iter().find(|c| !group.panels.contains(c)).copied())
    });

    for &panel in group.panels {
        doc.detach(panel);
    }
    for (chunk, items) in group.items.chunks(breakpoint.items_per_panel).enumerate() {
        let panel = group.panels[chunk.min(group.panels.len() - 1)];
        for &item in items {
            doc.append_child(panel, item);
        }
    }
    for &panel in group.panels {
        doc.insert_before(parent, panel, anchor);
    }
}
