//! Activation sources

use serde::{Deserialize, Serialize};

/// Where an activation request came from
///
/// Only `Click` is user-initiated; every other source moves the viewport
/// instantly (or not at all) so programmatic moves never animate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// First activation when the component attaches
    #[default]
    Init,
    /// Tab click or keyboard navigation
    Click,
    /// Settled native scroll of the track
    Scroll,
    /// Viewport width changed
    Resize,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Init => "init",
            Source::Click => "click",
            Source::Scroll => "scroll",
            Source::Resize => "resize",
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Source::Click)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
