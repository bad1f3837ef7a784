//! Slidekit error types

use thiserror::Error;

/// Errors raised while attaching a component to its markup
///
/// None of these are fatal to the host: a component that fails to attach
/// leaves its markup untouched and the page keeps the static content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlideError {
    /// The component root has no elements with the given role
    #[error("no elements with role \"{0}\" inside the component")]
    MissingRole(&'static str),

    /// No element marked `data-track` inside the component
    #[error("scroll track not found")]
    MissingTrack,

    /// The element id no longer exists in the document
    #[error("element is not part of the document")]
    MissingElement,

    /// Breakpoint lists produced no usable range
    #[error("no usable breakpoints in \"{breakpoints}\" / \"{visible}\"")]
    EmptyBreakpoints { breakpoints: String, visible: String },

    /// The initial activation could not resolve a tab/panel pair
    #[error("initial activation failed for index {0}")]
    InitialActivation(usize),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config text was not valid TOML or had the wrong shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was out of its accepted range
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for component setup
pub type Result<T> = std::result::Result<T, SlideError>;
