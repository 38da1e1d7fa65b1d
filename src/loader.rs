use crate::error::{DashboardError, Result};
use crate::repository::ProjectSource;
use crate::types::Project;
use crate::util::{parse_locale_decimal, year_of};
use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub invalid_investment: usize,
    pub invalid_dates: usize,
}

/// Load the dataset at `path`, picking the reader from the file extension.
pub fn load_projects(path: &Path) -> Result<(Vec<Project>, LoadReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let (projects, mut report) = match ext.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => {
            return Err(DashboardError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    // Bad values are kept: the aggregators skip them where they matter.
    for p in &projects {
        if parse_locale_decimal(&p.inversion).is_none() {
            report.invalid_investment += 1;
        }
        if year_of(&p.fecha).is_none() {
            report.invalid_dates += 1;
        }
    }
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        "dataset loaded"
    );
    Ok((projects, report))
}

fn load_json(path: &Path) -> Result<(Vec<Project>, LoadReport)> {
    let reader = BufReader::new(File::open(path)?);
    let projects: Vec<Project> = serde_json::from_reader(reader)?;
    let report = LoadReport {
        total_rows: projects.len(),
        loaded_rows: projects.len(),
        ..LoadReport::default()
    };
    Ok((projects, report))
}

fn load_csv(path: &Path) -> Result<(Vec<Project>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut projects = Vec::new();

    for (idx, result) in rdr.deserialize::<Project>().enumerate() {
        report.total_rows += 1;
        match result {
            Ok(p) => projects.push(p),
            Err(e) => {
                // +2: one for the header, one for 1-based line numbers.
                debug!(line = idx + 2, error = %e, "skipping unreadable row");
                report.parse_errors += 1;
            }
        }
    }
    report.loaded_rows = projects.len();
    Ok((projects, report))
}

/// Dataset stored on disk.
///
/// Keeps the [`LoadReport`] of its first successful fetch for diagnostics.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    report: OnceCell<LoadReport>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            report: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn report(&self) -> Option<&LoadReport> {
        self.report.get()
    }
}

impl ProjectSource for FileSource {
    fn fetch(&self) -> Result<Vec<Project>> {
        let (projects, report) = load_projects(&self.path)?;
        let _ = self.report.set(report);
        Ok(projects)
    }
}

/// Dataset already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    projects: Vec<Project>,
}

impl StaticSource {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }
}

impl ProjectSource for StaticSource {
    fn fetch(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }
}
