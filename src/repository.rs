//! The loaded project collection.
use crate::error::Result;
use crate::filter::{filter_projects, RegionFilter, ALL_REGIONS};
use crate::types::Project;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Where the dataset comes from.
pub trait ProjectSource {
    fn fetch(&self) -> Result<Vec<Project>>;
}

/// Holds the dataset once it has been loaded. Never mutated afterwards.
#[derive(Debug, Default)]
pub struct ProjectRepository {
    projects: OnceCell<Vec<Project>>,
    error: Mutex<Option<String>>,
}

impl ProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the dataset from `source` unless it is already present.
    ///
    /// A failure leaves the collection empty and records the message in the
    /// error slot. Nothing is retried; a later call tries the source again.
    pub fn load<S: ProjectSource + ?Sized>(&self, source: &S) -> &[Project] {
        if let Some(projects) = self.projects.get() {
            debug!("dataset already loaded, skipping fetch");
            return projects;
        }
        match self.projects.get_or_try_init(|| source.fetch()) {
            Ok(projects) => {
                self.set_error(None);
                info!(count = projects.len(), "projects loaded");
                projects
            }
            Err(e) => {
                let msg = format!("Error loading projects: {}", e);
                warn!("{}", msg);
                self.set_error(Some(msg));
                &[]
            }
        }
    }

    /// The full collection, empty until a load succeeds.
    pub fn projects(&self) -> &[Project] {
        self.projects.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loaded(&self) -> bool {
        self.projects.get().is_some()
    }

    /// Message of the last failed load, if the dataset is still missing.
    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// `"Todas"` followed by every distinct non-empty region, sorted.
    pub fn available_regions(&self) -> Vec<String> {
        let regions: BTreeSet<&str> = self
            .projects()
            .iter()
            .map(|p| p.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        std::iter::once(ALL_REGIONS)
            .chain(regions)
            .map(str::to_string)
            .collect()
    }

    pub fn filtered(&self, filter: &RegionFilter) -> Vec<&Project> {
        filter_projects(self.projects(), filter)
    }

    fn set_error(&self, msg: Option<String>) {
        *self
            .error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = msg;
    }
}
