//! Slidekit Core
//!
//! Foundational pieces shared by the slidekit components:
//!
//! - **Element tree**: a retained document with attributes, styles, a one-axis
//!   flow layout and scroll offsets
//! - **Event bus**: synchronous, ordered listeners with typed payloads
//! - **Focus and key helpers**: tab-order toggling and key name normalization
//! - **Config**: the process-wide reduced-motion / font-size settings
//!
//! # Example
//!
//! ```rust
//! use slidekit_core::dom::Document;
//!
//! let mut doc = Document::new();
//! let tab = doc.append_new(doc.body(), "button");
//! doc.set_attribute(tab, "role", "tab");
//! assert_eq!(doc.query_attr(doc.body(), "role", Some("tab")), vec![tab]);
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod focus;
pub mod key;
pub mod source;

pub use config::{global_config, set_global_config, try_global_config, Config};
pub use dom::{Document, ElementId, SharedDocument};
pub use error::{ConfigError, Result, SlideError};
pub use events::{EventBus, ListenerId};
pub use key::Key;
pub use source::Source;
