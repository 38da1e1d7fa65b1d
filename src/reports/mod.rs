//! The three dashboard views and their composition.
//!
//! Every view is a pure function of an already-filtered slice of projects;
//! [`Dashboard::build`] applies the region filter once and hands the same
//! slice to each of them.
pub mod admission;
pub mod investment;
pub mod processing;

use crate::filter::{filter_projects, RegionFilter};
use crate::types::Project;
use serde::Serialize;
use tracing::debug;

pub use admission::AdmissionReport;
pub use investment::InvestmentReport;
pub use processing::ProcessingReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub region: String,
    pub project_count: usize,
    pub admission: AdmissionReport,
    pub investment: InvestmentReport,
    pub processing: ProcessingReport,
}

impl Dashboard {
    pub fn build(projects: &[Project], filter: &RegionFilter) -> Self {
        let filtered = filter_projects(projects, filter);
        debug!(region = %filter, count = filtered.len(), "building dashboard");
        Dashboard {
            region: filter.to_string(),
            project_count: filtered.len(),
            admission: admission::build(&filtered),
            investment: investment::build(&filtered),
            processing: processing::build(&filtered),
        }
    }
}
