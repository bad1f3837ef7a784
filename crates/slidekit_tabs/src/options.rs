//! Root-element attributes

use serde::Serialize;
use slidekit_core::{Document, ElementId};

/// Transition delay when the root carries no `delay`
pub const DEFAULT_DELAY_MS: u32 = 300;

/// Arrow-key axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(Direction::Horizontal),
            "vertical" => Some(Direction::Vertical),
            _ => None,
        }
    }
}

/// Slider panel layout (`type` attribute)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// One panel per viewport
    #[default]
    Single,
    /// Items regrouped into panels by breakpoint
    Group,
    /// Panels of varying width
    Flex,
}

impl LayoutType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(LayoutType::Single),
            "group" => Some(LayoutType::Group),
            "flex" => Some(LayoutType::Flex),
            _ => None,
        }
    }
}

/// Options shared by every tabs component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TabsOptions {
    pub delay_ms: u32,
    pub direction: Direction,
}

impl Default for TabsOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            direction: Direction::Horizontal,
        }
    }
}

impl TabsOptions {
    pub fn from_element(doc: &Document, root: ElementId) -> Self {
        let defaults = Self::default();
        Self {
            delay_ms: doc
                .get_attribute(root, "delay")
                .and_then(parse_ms)
                .unwrap_or(defaults.delay_ms),
            direction: doc
                .get_attribute(root, "direction")
                .and_then(Direction::parse)
                .unwrap_or(defaults.direction),
        }
    }
}

/// Slider-specific options
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SliderOptions {
    pub layout: LayoutType,
    pub looped: bool,
    pub breakpoints: Option<String>,
    pub visible: Option<String>,
    /// Scroll animation length; `None` follows the transition delay
    pub duration_ms: Option<u32>,
}

impl SliderOptions {
    pub fn from_element(doc: &Document, root: ElementId) -> Self {
        Self {
            layout: doc
                .get_attribute(root, "type")
                .and_then(LayoutType::parse)
                .unwrap_or_default(),
            looped: doc
                .get_attribute(root, "loop")
                .is_some_and(|v| v != "false"),
            breakpoints: doc.get_attribute(root, "breakpoints").map(str::to_string),
            visible: doc.get_attribute(root, "visible").map(str::to_string),
            duration_ms: doc.get_attribute(root, "duration").and_then(parse_ms),
        }
    }
}

/// Parse a comma-separated number list
///
/// Entries that are empty or not finite numbers come back as `None` so
/// parallel lists stay aligned. Blank text yields an empty list.
pub fn parse_number_list(text: &str) -> Vec<Option<f32>> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',')
        .map(str::trim)
        .map(|entry| entry.parse::<f32>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn parse_ms(value: &str) -> Option<u32> {
    let ms = value.trim().trim_end_matches("ms").parse::<f32>().ok()?;
    (ms.is_finite() && ms >= 0.0).then(|| ms.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_list_keeps_positions() {
        assert_eq!(
            parse_number_list("0, 600,abc,NaN,1200"),
            vec![Some(0.0), Some(600.0), None, None, Some(1200.0)]
        );
        assert!(parse_number_list("").is_empty());
        assert!(parse_number_list("  ").is_empty());
        assert_eq!(
            parse_number_list("0,,900"),
            vec![Some(0.0), None, Some(900.0)]
        );
        assert_eq!(parse_number_list("inf"), vec![None]);
    }

    #[test]
    fn test_tabs_options_from_attributes() {
        let mut doc = Document::new();
        let root = doc.append_new(doc.body(), "div");
        assert_eq!(TabsOptions::from_element(&doc, root), TabsOptions::default());

        doc.set_attribute(root, "delay", "150ms");
        doc.set_attribute(root, "direction", "Vertical");
        let options = TabsOptions::from_element(&doc, root);
        assert_eq!(options.delay_ms, 150);
        assert_eq!(options.direction, Direction::Vertical);

        doc.set_attribute(root, "delay", "-5");
        assert_eq!(TabsOptions::from_element(&doc, root).delay_ms, DEFAULT_DELAY_MS);
    }

    #[test]
    fn test_slider_options_from_attributes() {
        let mut doc = Document::new();
        let root = doc.append_new(doc.body(), "div");
        doc.set_attribute(root, "type", "flex");
        doc.set_attribute(root, "loop", "");
        doc.set_attribute(root, "duration", "450");

        let options = SliderOptions::from_element(&doc, root);
        assert_eq!(options.layout, LayoutType::Flex);
        assert!(options.looped);
        assert_eq!(options.duration_ms, Some(450));
        assert_eq!(options.breakpoints, None);

        doc.set_attribute(root, "loop", "false");
        doc.set_attribute(root, "type", "carousel");
        let options = SliderOptions::from_element(&doc, root);
        assert!(!options.looped);
        assert_eq!(options.layout, LayoutType::Single);
    }
}
