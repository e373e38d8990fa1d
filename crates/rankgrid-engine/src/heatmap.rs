//! Rank→color banding and the per-cell grid view.
//!
//! The banding is a display convention inherited from the rendering layer and
//! must stay byte-compatible with it: rank ≤ 3 is green, 4–10 yellow, 11–20
//! orange, everything else (including "not found") red.

use serde::{Deserialize, Serialize};

use crate::types::{
    BusinessRank, CompetitorAtPoint, GridCellReport, PointObservation, TargetBusiness,
};

/// Heat-map color band for one observed rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankColor {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Band a 1-based rank into its heat-map color.
#[must_use]
pub fn rank_color(rank: u32) -> RankColor {
    match rank {
        0..=3 => RankColor::Green,
        4..=10 => RankColor::Yellow,
        11..=20 => RankColor::Orange,
        _ => RankColor::Red,
    }
}

/// Band an optional rank; a business absent from the cell renders red.
#[must_use]
pub fn color_for(rank: Option<u32>) -> RankColor {
    rank.map_or(RankColor::Red, rank_color)
}

/// Whether a map-pack entry is the tracked target business.
///
/// Place-id equality wins when both sides carry one. Otherwise fall back to
/// token matching: every target-name token longer than 2 characters must
/// appear in the candidate name (case-insensitive); a target name with no
/// such tokens degrades to a substring test.
#[must_use]
pub fn matches_target(candidate: &BusinessRank, target: &TargetBusiness) -> bool {
    if let (Some(candidate_id), Some(target_id)) = (&candidate.place_id, &target.place_id) {
        return candidate_id == target_id;
    }

    let name = candidate.name.to_lowercase();
    let target_name = target.name.to_lowercase();
    let tokens: Vec<&str> = target_name
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .collect();
    if tokens.is_empty() {
        name.contains(&target_name)
    } else {
        tokens.iter().all(|t| name.contains(t))
    }
}

/// Cap on competitors carried per cell in the grid view.
const TOP_COMPETITORS_PER_CELL: usize = 20;

/// Build the per-cell grid view from the collected observations.
///
/// Cells are ordered by flattened grid index. When `target` is set, each cell
/// carries the target's rank there (if any) and its color band; without a
/// target both fields stay `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn build_grid_cells(
    observations: &[PointObservation],
    target: Option<&TargetBusiness>,
) -> Vec<GridCellReport> {
    let mut cells: Vec<GridCellReport> = observations
        .iter()
        .map(|obs| {
            let target_rank = target.and_then(|t| {
                obs.results
                    .iter()
                    .find(|b| matches_target(b, t))
                    .map(|b| b.rank)
            });
            GridCellReport {
                row: obs.point.row,
                col: obs.point.col,
                lat: obs.point.lat,
                lng: obs.point.lng,
                total_results: obs.results.len() as u32,
                target_rank,
                target_color: target.map(|_| color_for(target_rank)),
                top_competitors: obs
                    .results
                    .iter()
                    .take(TOP_COMPETITORS_PER_CELL)
                    .map(|b| CompetitorAtPoint {
                        name: b.name.clone(),
                        rank: b.rank,
                        rating: b.rating,
                        reviews: b.reviews,
                    })
                    .collect(),
            }
        })
        .collect();
    cells.sort_by_key(|c| (c.row, c.col));
    cells
}
