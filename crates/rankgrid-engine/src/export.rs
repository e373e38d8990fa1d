//! CSV exports of a [`RankingReport`].
//!
//! Column names and order are pinned: downstream spreadsheet tooling imports
//! these files by position. Keep both headers byte-identical to the rendering
//! layer's expectations.

use crate::types::{BusinessAggregate, RankingReport};

const GRID_DETAIL_HEADER: [&str; 15] = [
    "Grid Row",
    "Grid Col",
    "Latitude",
    "Longitude",
    "Target Rank",
    "Total Results",
    "Business Name",
    "Rank",
    "Rating",
    "Reviews",
    "Address",
    "Phone",
    "Coverage %",
    "Avg Rank",
    "Appearances",
];

const COMPETITOR_ANALYSIS_HEADER: [&str; 13] = [
    "Rank",
    "Business Name",
    "Coverage %",
    "Appearances",
    "Avg Rank",
    "Best Rank",
    "Worst Rank",
    "Rating",
    "Reviews",
    "Address",
    "Phone",
    "Latitude",
    "Longitude",
];

/// Businesses listed in the leaderboard section of the detail export.
const TOP_COMPETITOR_ROWS: usize = 20;

fn opt_num<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "0".to_string(), |v| v.to_string())
}

fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn escape(cell: &str) -> String {
    let escaped = cell.replace('"', "\"\"");
    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn header_row(header: &[&str]) -> Vec<String> {
    header.iter().map(|h| (*h).to_string()).collect()
}

/// Per-cell detail export: one target row per cell (when a target is set),
/// then one row per competitor seen at that cell, followed by a summary
/// section and the top-20 leaderboard.
#[must_use]
pub fn grid_detail_csv(report: &RankingReport) -> String {
    let mut rows: Vec<Vec<String>> = vec![header_row(&GRID_DETAIL_HEADER)];
    let target_stats = report.target.as_ref().and_then(|t| t.stats.as_ref());

    for cell in &report.grid {
        if let Some(target) = &report.target {
            let rank_text = cell
                .target_rank
                .map_or_else(|| "Not Found".to_string(), |r| r.to_string());
            rows.push(vec![
                cell.row.to_string(),
                cell.col.to_string(),
                cell.lat.to_string(),
                cell.lng.to_string(),
                rank_text.clone(),
                cell.total_results.to_string(),
                target.name.clone(),
                rank_text,
                target_stats.map_or(String::new(), |s| opt_num(s.rating)),
                target_stats.map_or(String::new(), |s| opt_num(s.reviews)),
                String::new(),
                String::new(),
                target_stats.map_or(String::new(), |s| format!("{:.2}", s.coverage)),
                target_stats.map_or(String::new(), |s| format!("{:.2}", s.avg_rank)),
                target_stats.map_or(String::new(), |s| s.appearances.to_string()),
            ]);
        }

        for comp in &cell.top_competitors {
            let full = find_business(report, &comp.name);
            rows.push(vec![
                cell.row.to_string(),
                cell.col.to_string(),
                cell.lat.to_string(),
                cell.lng.to_string(),
                String::new(),
                cell.total_results.to_string(),
                comp.name.clone(),
                comp.rank.to_string(),
                opt_num(comp.rating),
                opt_num(comp.reviews),
                full.map_or(String::new(), |b| opt_text(b.address.as_deref())),
                full.map_or(String::new(), |b| opt_text(b.phone.as_deref())),
                full.map_or(String::new(), |b| format!("{:.1}", b.coverage)),
                full.map_or(String::new(), |b| format!("{:.1}", b.avg_rank)),
                full.map_or(String::new(), |b| b.appearances.to_string()),
            ]);
        }
    }

    rows.push(vec![]);
    rows.push(vec!["SUMMARY".to_string()]);
    rows.push(vec!["Search Term".to_string(), report.search_term.clone()]);
    rows.push(vec![
        "Total Grid Points".to_string(),
        report.grid.len().to_string(),
    ]);
    rows.push(vec![
        "Total Unique Businesses".to_string(),
        report.summary.unique_businesses.to_string(),
    ]);
    rows.push(vec![
        "Execution Time (seconds)".to_string(),
        report.elapsed_seconds.to_string(),
    ]);
    rows.push(vec!["Success Rate".to_string(), success_rate(report)]);
    rows.push(vec![
        "City".to_string(),
        opt_text(report.city.as_deref()),
    ]);
    rows.push(vec![
        "State".to_string(),
        opt_text(report.state.as_deref()),
    ]);
    rows.push(vec![
        "Center Latitude".to_string(),
        report.center_lat.to_string(),
    ]);
    rows.push(vec![
        "Center Longitude".to_string(),
        report.center_lng.to_string(),
    ]);

    rows.push(vec![]);
    rows.push(vec!["TOP COMPETITORS BY COVERAGE".to_string()]);
    rows.push(header_row(&[
        "Rank",
        "Business Name",
        "Coverage %",
        "Avg Rank",
        "Rating",
        "Reviews",
        "Appearances",
    ]));
    for (idx, comp) in report
        .businesses
        .iter()
        .take(TOP_COMPETITOR_ROWS)
        .enumerate()
    {
        rows.push(vec![
            format!("#{}", idx + 1),
            comp.name.clone(),
            format!("{:.1}", comp.coverage),
            format!("{:.1}", comp.avg_rank),
            opt_num(comp.rating),
            opt_num(comp.reviews),
            comp.appearances.to_string(),
        ]);
    }

    to_csv(&rows)
}

/// Leaderboard-only export with per-business best/worst ranks.
#[must_use]
pub fn competitor_analysis_csv(report: &RankingReport) -> String {
    let mut rows: Vec<Vec<String>> = vec![header_row(&COMPETITOR_ANALYSIS_HEADER)];

    for (idx, comp) in report.businesses.iter().enumerate() {
        rows.push(vec![
            (idx + 1).to_string(),
            comp.name.clone(),
            format!("{:.1}", comp.coverage),
            comp.appearances.to_string(),
            format!("{:.1}", comp.avg_rank),
            comp.best_rank.to_string(),
            comp.worst_rank.to_string(),
            opt_num(comp.rating),
            opt_num(comp.reviews),
            opt_text(comp.address.as_deref()),
            opt_text(comp.phone.as_deref()),
            // Business coordinates are not part of the aggregate model;
            // columns stay for positional compatibility.
            String::new(),
            String::new(),
        ]);
    }

    to_csv(&rows)
}

fn find_business<'a>(report: &'a RankingReport, name: &str) -> Option<&'a BusinessAggregate> {
    report.businesses.iter().find(|b| b.name == name)
}

fn success_rate(report: &RankingReport) -> String {
    let attempted = report.summary.points_attempted.max(1);
    format!(
        "{:.1}",
        100.0 * f64::from(report.summary.points_observed) / f64::from(attempted)
    )
}
