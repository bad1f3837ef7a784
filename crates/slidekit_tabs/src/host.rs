//! Shared host services

use slidekit_animation::Scheduler;
use slidekit_core::{global_config, Config, SharedDocument};

/// Document, clock and config shared by every component on a page
#[derive(Clone, Debug)]
pub struct Host {
    doc: SharedDocument,
    scheduler: Scheduler,
    config: Config,
}

impl Host {
    /// Host using the process-wide config
    pub fn new(doc: SharedDocument, scheduler: Scheduler) -> Self {
        Self::with_config(doc, scheduler, global_config())
    }

    pub fn with_config(doc: SharedDocument, scheduler: Scheduler, config: Config) -> Self {
        Self {
            doc,
            scheduler,
            config,
        }
    }

    pub fn doc(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
