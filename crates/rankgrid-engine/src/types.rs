//! Data model for grid searches and their aggregated results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::heatmap::RankColor;

/// One sample location on the generated lattice.
///
/// `row` and `col` are 0-based and both lie in `[0, grid_size)`; `index` is
/// the flattened row-major position. Coordinates are rounded to 6 decimal
/// places by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: u32,
    pub col: u32,
    pub index: u32,
    pub lat: f64,
    pub lng: f64,
}

/// One entry of the ordered map-pack result at a grid point.
///
/// The rank is assigned by the external source (1-based); this crate never
/// re-ranks, it only consumes the given order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRank {
    pub name: String,
    pub place_id: Option<String>,
    pub rank: u32,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// The ranked result returned for one grid point. An empty `results` list is
/// valid: no businesses were found within the source's search radius there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointObservation {
    pub point: GridPoint,
    pub results: Vec<BusinessRank>,
}

/// One observed ranking of a business at a specific grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRanking {
    pub row: u32,
    pub col: u32,
    pub lat: f64,
    pub lng: f64,
    pub rank: u32,
}

/// Per-business summary computed across every grid point.
///
/// `avg_rank` is the arithmetic mean over observed appearances only;
/// absence at a point never contributes a penalty rank. A business absent
/// from all points is not represented at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAggregate {
    pub name: String,
    pub place_id: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Per-point rankings actually observed, in observation order.
    pub rankings: Vec<PointRanking>,
    pub appearances: u32,
    /// Percentage of grid points at which the business appeared, in [0, 100].
    pub coverage: f64,
    pub avg_rank: f64,
    pub best_rank: u32,
    pub worst_rank: u32,
    pub top3_count: u32,
    pub top10_count: u32,
}

/// A competitor as seen at one grid point (leaderboard excerpt for that cell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAtPoint {
    pub name: String,
    pub rank: u32,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
}

/// One cell of the per-point grid view used for heat-map rendering and the
/// grid detail CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCellReport {
    pub row: u32,
    pub col: u32,
    pub lat: f64,
    pub lng: f64,
    pub total_results: u32,
    /// The designated target business's rank at this cell, when one was
    /// requested and it appeared here.
    pub target_rank: Option<u32>,
    /// Color band for `target_rank`; absent when no target was requested.
    pub target_color: Option<RankColor>,
    /// Top results at this cell, capped at 20 entries.
    pub top_competitors: Vec<CompetitorAtPoint>,
}

/// The business the requester is tracking across the grid, as opposed to the
/// generic all-competitors mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBusiness {
    pub name: String,
    pub place_id: Option<String>,
}

/// Target-mode section of a report: the tracked business's aggregate, when it
/// appeared anywhere on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    pub name: String,
    pub place_id: Option<String>,
    pub stats: Option<BusinessAggregate>,
}

/// Input parameters for one grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub term: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_miles: f64,
    pub grid_size: u32,
    pub city: Option<String>,
    pub state: Option<String>,
    pub target: Option<TargetBusiness>,
}

/// Summary counters for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub unique_businesses: u32,
    /// Intended grid size squared, counting points whose lookup failed, so
    /// coverage percentages stay comparable across searches.
    pub points_attempted: u32,
    pub points_observed: u32,
}

/// The full result of one grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub search_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub search_term: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub radius_miles: f64,
    pub grid_size: u32,
    pub grid: Vec<GridCellReport>,
    /// Leaderboard: coverage descending, average rank ascending on ties.
    pub businesses: Vec<BusinessAggregate>,
    pub target: Option<TargetReport>,
    pub summary: ReportSummary,
    pub elapsed_seconds: f64,
    /// Set when the report was served from the result cache.
    pub from_cache: bool,
}
