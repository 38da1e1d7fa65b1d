//! Exports and console previews for the detail tables.
use crate::error::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

/// Make sure the directory `path` will be written into exists.
fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}

/// Export `rows` as CSV, one record per row with the serde-renamed headers.
///
/// Missing parent directories are created. An empty slice still produces the
/// file, just without a header line, since headers come from the first record.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    rows.iter().try_for_each(|row| wtr.serialize(row))?;
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "csv export written");
    Ok(())
}

/// Pretty-printed JSON snapshot of `value`, newline-terminated.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    debug!(path = %path.display(), "json export written");
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnnualApprovalRow;

    fn rows() -> Vec<AnnualApprovalRow> {
        vec![
            AnnualApprovalRow { year: 2019, entered: 4, approved: 1, approval_rate: 25.0 },
            AnnualApprovalRow { year: 2020, entered: 2, approved: 2, approval_rate: 100.0 },
        ]
    }

    #[test]
    fn test_render_table_limits_rows() {
        let out = render_table(&rows(), 1);
        assert!(out.contains("Year"));
        assert!(out.contains("2019"));
        assert!(!out.contains("2020"));
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table::<AnnualApprovalRow>(&[], 5), "(no rows)");
    }

    #[test]
    fn test_write_csv_uses_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("approvals.csv");
        write_csv(&path, &rows()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Year,Entered,Approved,ApprovalRate"));
        assert_eq!(lines.next(), Some("2019,4,1,25.0"));
    }

    #[test]
    fn test_exports_create_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("2024");
        let csv_path = nested.join("approvals.csv");
        let json_path = nested.join("snapshot.json");

        write_csv(&csv_path, &rows()).unwrap();
        write_json(&json_path, &rows()).unwrap();

        assert_eq!(std::fs::read_to_string(&csv_path).unwrap().lines().count(), 3);
        let json = std::fs::read_to_string(&json_path).unwrap();
        assert!(json.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["Year"], 2020);
        assert_eq!(parsed[1]["ApprovalRate"], 100.0);
    }

    #[test]
    fn test_write_csv_empty_rows_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv::<AnnualApprovalRow>(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_json(&blocker.join("snapshot.json"), &rows()).unwrap_err();
        assert!(matches!(err, crate::DashboardError::Io(_)));
    }
}
