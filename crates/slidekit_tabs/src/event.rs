//! Lifecycle events

use serde::Serialize;
use slidekit_core::{ElementId, Source};

use crate::index::IndexSet;

pub const DEACTIVATE: &str = "tabs:deactivate";
pub const ACTIVATE: &str = "tabs:activate";
pub const ACTIVATED: &str = "tabs:activated";

/// Which step of a transition an event reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TabsEventKind {
    /// Previous tab/panel released
    Deactivate,
    /// New tab/panel selected
    Activate,
    /// Transition delay elapsed, panels physically swapped
    Activated,
}

impl TabsEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            TabsEventKind::Deactivate => DEACTIVATE,
            TabsEventKind::Activate => ACTIVATE,
            TabsEventKind::Activated => ACTIVATED,
        }
    }
}

/// Payload carried by every lifecycle event
#[derive(Clone, Debug, PartialEq)]
pub struct TabsEvent {
    pub kind: TabsEventKind,
    pub indexes: IndexSet,
    pub tab: ElementId,
    pub panel: ElementId,
    pub last_tab: ElementId,
    pub last_panel: ElementId,
    pub source: Source,
}

impl TabsEvent {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub(crate) fn with_kind(&self, kind: TabsEventKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }
}
