//! Declared investment per year, split by DIA / EIA.
use crate::types::{AnnualInvestmentRow, InvestmentChartData, Project, ProjectKind};
use crate::util::{parse_locale_decimal, year_of};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentReport {
    pub chart_data: InvestmentChartData,
    pub total_historical_investment: f64,
    pub average_investment_per_project: f64,
    pub total_dia_investment: f64,
    pub total_eia_investment: f64,
    pub investment_table_data: Vec<AnnualInvestmentRow>,
}

#[derive(Debug, Default, Clone, Copy)]
struct YearInvestment {
    dia: f64,
    eia: f64,
    // Includes projects whose tipo is neither DIA nor EIA.
    total: f64,
}

fn yearly_investment(projects: &[&Project]) -> BTreeMap<i32, YearInvestment> {
    let mut by_year: BTreeMap<i32, YearInvestment> = BTreeMap::new();
    for p in projects {
        let Some(amount) = parse_locale_decimal(&p.inversion) else {
            debug!(id = p.id, inversion = %p.inversion, "unparseable investment, skipping");
            continue;
        };
        let Some(year) = year_of(&p.fecha) else {
            debug!(id = p.id, fecha = %p.fecha, "no entry year, skipping");
            continue;
        };
        let e = by_year.entry(year).or_default();
        match p.kind() {
            Some(ProjectKind::Dia) => e.dia += amount,
            Some(ProjectKind::Eia) => e.eia += amount,
            None => {}
        }
        e.total += amount;
    }
    by_year
}

/// Sum of every parseable investment, optionally restricted to one kind.
fn sum_investment(projects: &[&Project], kind: Option<ProjectKind>) -> f64 {
    projects
        .iter()
        .filter(|p| kind.is_none() || p.kind() == kind)
        .filter_map(|p| parse_locale_decimal(&p.inversion))
        .fold(0.0, |acc, v| acc + v)
}

pub fn chart_data(projects: &[&Project]) -> InvestmentChartData {
    let by_year = yearly_investment(projects);
    InvestmentChartData {
        years: by_year.keys().map(|y| y.to_string()).collect(),
        dia_investments: by_year.values().map(|v| v.dia).collect(),
        eia_investments: by_year.values().map(|v| v.eia).collect(),
    }
}

pub fn total_historical_investment(projects: &[&Project]) -> f64 {
    sum_investment(projects, None)
}

/// Historical total over the number of filtered projects, including the
/// ones whose investment could not be read. `0` for an empty set.
pub fn average_investment_per_project(projects: &[&Project]) -> f64 {
    if projects.is_empty() {
        return 0.0;
    }
    total_historical_investment(projects) / projects.len() as f64
}

pub fn total_dia_investment(projects: &[&Project]) -> f64 {
    sum_investment(projects, Some(ProjectKind::Dia))
}

pub fn total_eia_investment(projects: &[&Project]) -> f64 {
    sum_investment(projects, Some(ProjectKind::Eia))
}

pub fn table_data(projects: &[&Project]) -> Vec<AnnualInvestmentRow> {
    yearly_investment(projects)
        .into_iter()
        .map(|(year, v)| AnnualInvestmentRow {
            year,
            dia_investment: v.dia,
            eia_investment: v.eia,
            total_investment: v.total,
        })
        .collect()
}

pub fn build(projects: &[&Project]) -> InvestmentReport {
    InvestmentReport {
        chart_data: chart_data(projects),
        total_historical_investment: total_historical_investment(projects),
        average_investment_per_project: average_investment_per_project(projects),
        total_dia_investment: total_dia_investment(projects),
        total_eia_investment: total_eia_investment(projects),
        investment_table_data: table_data(projects),
    }
}
