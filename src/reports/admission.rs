//! Entered vs. approved projects per year.
use crate::types::{AdmitApprovChartData, AnnualApprovalRow, Project};
use crate::util::{rate_label, rate_value, year_of};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionReport {
    pub chart_data: AdmitApprovChartData,
    pub total_entered_projects: usize,
    pub total_approved_projects: usize,
    pub approval_rate: String,
    pub projects_table_data: Vec<AnnualApprovalRow>,
}

#[derive(Debug, Default, Clone, Copy)]
struct YearCounts {
    entered: usize,
    approved: usize,
}

/// Counts keyed by entry year. Projects without a readable entry date are
/// left out of the yearly view.
fn yearly_counts(projects: &[&Project]) -> BTreeMap<i32, YearCounts> {
    let mut by_year: BTreeMap<i32, YearCounts> = BTreeMap::new();
    for p in projects {
        let Some(year) = year_of(&p.fecha) else {
            debug!(id = p.id, fecha = %p.fecha, "no entry year, skipping");
            continue;
        };
        let e = by_year.entry(year).or_default();
        e.entered += 1;
        if p.is_approved() {
            e.approved += 1;
        }
    }
    by_year
}

pub fn chart_data(projects: &[&Project]) -> AdmitApprovChartData {
    let by_year = yearly_counts(projects);
    AdmitApprovChartData {
        years: by_year.keys().map(|y| y.to_string()).collect(),
        entered: by_year.values().map(|c| c.entered).collect(),
        approved: by_year.values().map(|c| c.approved).collect(),
    }
}

pub fn total_entered(projects: &[&Project]) -> usize {
    projects.len()
}

pub fn total_approved(projects: &[&Project]) -> usize {
    projects.iter().filter(|p| p.is_approved()).count()
}

/// Share of approved projects as a two-decimal percentage string.
pub fn approval_rate(projects: &[&Project]) -> String {
    rate_label(total_approved(projects), total_entered(projects))
}

pub fn table_data(projects: &[&Project]) -> Vec<AnnualApprovalRow> {
    yearly_counts(projects)
        .into_iter()
        .map(|(year, c)| AnnualApprovalRow {
            year,
            entered: c.entered,
            approved: c.approved,
            approval_rate: rate_value(c.approved, c.entered),
        })
        .collect()
}

pub fn build(projects: &[&Project]) -> AdmissionReport {
    AdmissionReport {
        chart_data: chart_data(projects),
        total_entered_projects: total_entered(projects),
        total_approved_projects: total_approved(projects),
        approval_rate: approval_rate(projects),
        projects_table_data: table_data(projects),
    }
}
