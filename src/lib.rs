//! Aggregations over environmental-impact review projects.
//!
//! The dataset is loaded once into a [`repository::ProjectRepository`]; every
//! view is then a pure function of that collection and a
//! [`filter::RegionFilter`].
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod repository;
pub mod types;
pub mod util;

#[cfg(test)]
mod test_support;

pub use error::{DashboardError, Result};
pub use filter::{filter_projects, RegionFilter, ALL_REGIONS};
pub use reports::Dashboard;
pub use repository::ProjectRepository;
pub use types::Project;
