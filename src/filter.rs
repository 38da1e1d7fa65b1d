//! Region selection shared by every aggregation view.
use crate::types::Project;
use std::fmt;

/// Sentinel region value meaning "every region".
pub const ALL_REGIONS: &str = "Todas";

/// The currently selected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter(String);

impl RegionFilter {
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    pub fn all() -> Self {
        Self(ALL_REGIONS.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_REGIONS
    }

    pub fn matches(&self, project: &Project) -> bool {
        self.is_all() || project.region == self.0
    }
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Projects visible under `filter`, in dataset order.
pub fn filter_projects<'a>(projects: &'a [Project], filter: &RegionFilter) -> Vec<&'a Project> {
    projects.iter().filter(|p| filter.matches(p)).collect()
}
