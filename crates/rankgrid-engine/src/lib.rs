//! Grid ranking analysis engine.
//!
//! Generates a uniform lattice of sample points around a center coordinate,
//! collects the ranked map-pack results observed at each point from a
//! [`RankingSource`], and folds them into per-business coverage statistics
//! (coverage %, average/best/worst rank, appearance counts) for heat-map and
//! leaderboard rendering. A bounded, time-expiring [`SearchCache`] memoizes
//! whole reports keyed by canonicalized search parameters.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod grid;
pub mod heatmap;
pub mod search;
pub mod types;

pub use aggregate::aggregate_observations;
pub use cache::{cache_key, CacheEntryInfo, CacheStats, SearchCache};
pub use error::EngineError;
pub use export::{competitor_analysis_csv, grid_detail_csv};
pub use grid::{generate_grid_points, grid_summary};
pub use heatmap::{rank_color, RankColor};
pub use search::{run_grid_search, GridSearchService, RankingSource};
pub use types::{
    BusinessAggregate, BusinessRank, GridCellReport, GridPoint, PointObservation, RankingReport,
    SearchParams, TargetBusiness,
};
