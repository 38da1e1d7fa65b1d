//! Processing time of approved projects, from entry to resolution.
//!
//! Only approved projects carrying both dates take part. A project whose
//! dates cannot be read still gets a detail row, but is left out of every
//! average and of the longest/shortest search.
use crate::types::{DiffTimeChartData, ProcessingExtreme, ProcessingTimeRow, Project, ProjectKind};
use crate::util::{days_between, rounded_average, year_of};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingReport {
    pub chart_data: DiffTimeChartData,
    pub overall_average_processing_time: i64,
    pub project_with_longest_processing_time: Option<ProcessingExtreme>,
    pub project_with_shortest_processing_time: Option<ProcessingExtreme>,
    pub processing_time_table_data: Vec<ProcessingTimeRow>,
}

/// An approved project with both dates present.
struct Qualifying<'a> {
    project: &'a Project,
    resolution: &'a str,
    days: Option<i64>,
}

fn qualifying<'a>(projects: &[&'a Project]) -> Vec<Qualifying<'a>> {
    projects
        .iter()
        .copied()
        .filter(|p| p.is_approved() && !p.fecha.is_empty())
        .filter_map(|p| {
            let resolution = p.resolution_date()?;
            let days = days_between(&p.fecha, resolution);
            if days.is_none() {
                debug!(id = p.id, fecha = %p.fecha, resolution, "unreadable dates");
            }
            Some(Qualifying {
                project: p,
                resolution,
                days,
            })
        })
        .collect()
}

/// Qualifying projects with a computable day count.
fn timed<'a>(projects: &[&'a Project]) -> impl Iterator<Item = (&'a Project, &'a str, i64)> {
    qualifying(projects)
        .into_iter()
        .filter_map(|q| q.days.map(|d| (q.project, q.resolution, d)))
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    total_days: i64,
    count: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct YearTotals {
    dia: DayTotals,
    eia: DayTotals,
}

/// Average days per resolution year and kind.
pub fn chart_data(projects: &[&Project]) -> DiffTimeChartData {
    let mut by_year: BTreeMap<i32, YearTotals> = BTreeMap::new();
    for (p, resolution, days) in timed(projects) {
        let Some(year) = year_of(resolution) else {
            continue;
        };
        // The year shows up even when the project is neither DIA nor EIA.
        let e = by_year.entry(year).or_default();
        let bucket = match p.kind() {
            Some(ProjectKind::Dia) => &mut e.dia,
            Some(ProjectKind::Eia) => &mut e.eia,
            None => continue,
        };
        bucket.total_days += days;
        bucket.count += 1;
    }
    DiffTimeChartData {
        years: by_year.keys().map(|y| y.to_string()).collect(),
        dia_avg_days: by_year
            .values()
            .map(|t| rounded_average(t.dia.total_days, t.dia.count))
            .collect(),
        eia_avg_days: by_year
            .values()
            .map(|t| rounded_average(t.eia.total_days, t.eia.count))
            .collect(),
    }
}

pub fn overall_average_processing_time(projects: &[&Project]) -> i64 {
    let (total, count) = timed(projects).fold((0i64, 0usize), |(t, c), (_, _, d)| (t + d, c + 1));
    rounded_average(total, count)
}

fn extreme(p: &Project, days: i64) -> ProcessingExtreme {
    ProcessingExtreme {
        project: p.nombre.clone(),
        id: p.id,
        days,
    }
}

/// Project with the most processing days. Ties keep the first one found.
pub fn longest_processing_time(projects: &[&Project]) -> Option<ProcessingExtreme> {
    let mut best: Option<(&Project, i64)> = None;
    for (p, _, days) in timed(projects) {
        if best.map_or(true, |(_, b)| days > b) {
            best = Some((p, days));
        }
    }
    best.map(|(p, d)| extreme(p, d))
}

/// Project with the fewest processing days. Ties keep the first one found.
pub fn shortest_processing_time(projects: &[&Project]) -> Option<ProcessingExtreme> {
    let mut best: Option<(&Project, i64)> = None;
    for (p, _, days) in timed(projects) {
        if best.map_or(true, |(_, b)| days < b) {
            best = Some((p, days));
        }
    }
    best.map(|(p, d)| extreme(p, d))
}

/// One row per qualifying project, by entry year then processing days.
pub fn table_data(projects: &[&Project]) -> Vec<ProcessingTimeRow> {
    let mut rows: Vec<ProcessingTimeRow> = qualifying(projects)
        .into_iter()
        .map(|q| ProcessingTimeRow {
            id: q.project.id,
            name: q.project.nombre.clone(),
            year: year_of(&q.project.fecha),
            project_type: q.project.tipo.clone(),
            entry_date: q.project.fecha.clone(),
            resolution_date: q.resolution.to_string(),
            processing_days: q.days,
        })
        .collect();
    rows.sort_by_key(|r| (r.year, r.processing_days.unwrap_or(0)));
    rows
}

pub fn build(projects: &[&Project]) -> ProcessingReport {
    ProcessingReport {
        chart_data: chart_data(projects),
        overall_average_processing_time: overall_average_processing_time(projects),
        project_with_longest_processing_time: longest_processing_time(projects),
        project_with_shortest_processing_time: shortest_processing_time(projects),
        processing_time_table_data: table_data(projects),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{project, ProjectExt};

    fn refs(data: &[Project]) -> Vec<&Project> {
        data.iter().collect()
    }

    #[test]
    fn test_single_project() {
        let data = vec![project(7, "Maule", "01-01-2020").approved().resolved_on("11-01-2020")];
        let report = build(&refs(&data));
        assert_eq!(report.overall_average_processing_time, 10);
        let longest = report.project_with_longest_processing_time.unwrap();
        let shortest = report.project_with_shortest_processing_time.unwrap();
        assert_eq!(longest, shortest);
        assert_eq!(longest.id, 7);
        assert_eq!(longest.days, 10);
        assert_eq!(longest.project, "Proyecto 7");
        assert_eq!(report.processing_time_table_data[0].processing_days, Some(10));
    }

    #[test]
    fn test_only_approved_with_both_dates_qualify() {
        let data = vec![
            project(1, "Maule", "01-01-2020").resolved_on("11-01-2020"),
            project(2, "Maule", "01-01-2020").approved(),
            project(3, "Maule", "01-01-2020").approved().resolved_on(""),
            project(4, "Maule", "01-01-2020").approved().resolved_on("21-01-2020"),
        ];
        let report = build(&refs(&data));
        assert_eq!(report.processing_time_table_data.len(), 1);
        assert_eq!(report.processing_time_table_data[0].id, 4);
        assert_eq!(report.overall_average_processing_time, 20);
    }

    #[test]
    fn test_chart_buckets_by_resolution_year() {
        let data = vec![
            project(1, "Maule", "01-12-2019").tipo("DIA").approved().resolved_on("11-01-2020"),
            project(2, "Maule", "01-01-2020").tipo("DIA").approved().resolved_on("12-01-2020"),
            project(3, "Maule", "01-01-2020").tipo("EIA").approved().resolved_on("01-01-2021"),
            project(4, "Maule", "01-01-2022").tipo("PAS").approved().resolved_on("01-02-2022"),
        ];
        let chart = chart_data(&refs(&data));
        assert_eq!(chart.years, vec!["2020", "2021", "2022"]);
        // (41 + 11) / 2
        assert_eq!(chart.dia_avg_days, vec![26, 0, 0]);
        assert_eq!(chart.eia_avg_days, vec![0, 366, 0]);
    }

    #[test]
    fn test_extremes_keep_first_on_ties() {
        let data = vec![
            project(1, "Maule", "01-01-2020").approved().resolved_on("06-01-2020"),
            project(2, "Maule", "01-01-2020").approved().resolved_on("31-01-2020"),
            project(3, "Maule", "01-01-2020").approved().resolved_on("31-01-2020"),
            project(4, "Maule", "10-01-2020").approved().resolved_on("15-01-2020"),
        ];
        let refs = refs(&data);
        assert_eq!(longest_processing_time(&refs).unwrap().id, 2);
        assert_eq!(shortest_processing_time(&refs).unwrap().id, 1);
    }

    #[test]
    fn test_zero_day_project_is_still_longest() {
        let data = vec![project(1, "Maule", "01-01-2020").approved().resolved_on("01-01-2020")];
        let longest = longest_processing_time(&refs(&data)).unwrap();
        assert_eq!(longest.days, 0);
    }

    #[test]
    fn test_invalid_dates_keep_row_but_skip_math() {
        let data = vec![
            project(1, "Maule", "01-01-2021").approved().resolved_on("31-02-2021"),
            project(2, "Maule", "01-01-2021").approved().resolved_on("05-01-2021"),
            project(3, "Maule", "01-01-2020").approved().resolved_on("03-01-2020"),
        ];
        let report = build(&refs(&data));
        assert_eq!(report.overall_average_processing_time, 3);
        let ids: Vec<i64> = report.processing_time_table_data.iter().map(|r| r.id).collect();
        // 2020 first; within 2021 the unreadable row sorts as 0 days.
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(report.processing_time_table_data[1].processing_days, None);
    }

    #[test]
    fn test_empty_set_defaults() {
        let report = build(&[]);
        assert_eq!(report.overall_average_processing_time, 0);
        assert!(report.project_with_longest_processing_time.is_none());
        assert!(report.project_with_shortest_processing_time.is_none());
        assert!(report.chart_data.years.is_empty());
    }
}
