//! Plain-text rendering of search reports for the terminal.

use rankgrid_engine::{grid_summary, RankingReport};

fn fmt_opt_num<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Shorten a name to at most `max` characters, ellipsized. Counts chars, not
/// bytes, so multibyte names never split mid-character.
fn ellipsize(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max.saturating_sub(3)).collect();
        short.push_str("...");
        short
    }
}

pub(crate) fn print_grid_summary(grid_size: u32, radius_miles: f64) {
    let summary = grid_summary(grid_size, radius_miles);
    println!("grid {grid_size}x{grid_size} at {radius_miles} mi radius");
    println!("  total points:  {}", summary.total_points);
    println!("  spacing:       {:.2} mi", summary.spacing_miles);
    println!("  coverage area: {:.1} sq mi", summary.coverage_area_sq_miles);
    println!("  map zoom:      {}", summary.zoom_level);
}

pub(crate) fn print_report(report: &RankingReport, top: usize) {
    let location = match (&report.city, &report.state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (Some(city), None) => city.clone(),
        _ => format!("{:.4}, {:.4}", report.center_lat, report.center_lng),
    };
    println!(
        "\"{}\" near {} ({}x{} grid, {} mi radius{})",
        report.search_term,
        location,
        report.grid_size,
        report.grid_size,
        report.radius_miles,
        if report.from_cache { ", cached" } else { "" },
    );
    println!(
        "{} unique businesses across {}/{} points in {:.1}s",
        report.summary.unique_businesses,
        report.summary.points_observed,
        report.summary.points_attempted,
        report.elapsed_seconds,
    );

    if let Some(target) = &report.target {
        match &target.stats {
            Some(stats) => println!(
                "target \"{}\": coverage {:.1}%, avg rank {:.1}, best {}, worst {}",
                target.name, stats.coverage, stats.avg_rank, stats.best_rank, stats.worst_rank,
            ),
            None => println!("target \"{}\": not found in any grid point", target.name),
        }
    }

    println!();
    println!(
        "{:<4} {:<40} {:>8} {:>6} {:>8} {:>6} {:>7}",
        "#", "Business", "Cov %", "Avg", "Best", "Appts", "Rating"
    );
    for (i, b) in report.businesses.iter().take(top).enumerate() {
        let name = ellipsize(&b.name, 40);
        println!(
            "{:<4} {:<40} {:>8.1} {:>6.1} {:>8} {:>6} {:>7}",
            i + 1,
            name,
            b.coverage,
            b.avg_rank,
            b.best_rank,
            b.appearances,
            fmt_opt_num(b.rating),
        );
    }
}
