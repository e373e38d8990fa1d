//! Grid search orchestration.
//!
//! Validates input, generates the lattice, fans out one ranking lookup per
//! point with bounded concurrency, and folds the successful observations into
//! a [`RankingReport`]. Per-point lookup failures are logged and skipped; the
//! coverage denominator stays at the full grid size so percentages remain
//! comparable across searches. Aggregation is order-independent, so the
//! fan-out completion order never affects the result.

use std::future::Future;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::aggregate::aggregate_observations;
use crate::cache::{cache_key, SearchCache};
use crate::error::EngineError;
use crate::grid::generate_grid_points;
use crate::heatmap::{build_grid_cells, matches_target};
use crate::types::{
    BusinessRank, GridPoint, PointObservation, RankingReport, ReportSummary, SearchParams,
    TargetReport,
};

/// Radius cap in miles, matching the product's input bound.
pub const MAX_RADIUS_MILES: f64 = 30.0;

/// The per-point ranking lookup boundary.
///
/// Implementations return the ordered map-pack for one grid point. An empty
/// vec is a valid "nothing found here"; errors are transient signals that the
/// orchestrator skips. Retry policy belongs to the implementation, not here.
pub trait RankingSource {
    type Error: std::fmt::Display;

    fn ranks_at(
        &self,
        term: &str,
        point: &GridPoint,
    ) -> impl Future<Output = Result<Vec<BusinessRank>, Self::Error>> + Send;
}

/// Check preconditions before any grid generation happens.
///
/// # Errors
///
/// Returns the matching [`EngineError`] variant for an empty term, a
/// non-positive or non-finite radius, a zero grid size, or a non-finite
/// center coordinate.
pub fn validate_params(params: &SearchParams) -> Result<(), EngineError> {
    if params.term.trim().is_empty() {
        return Err(EngineError::EmptyTerm);
    }
    if !params.radius_miles.is_finite() || params.radius_miles <= 0.0 {
        return Err(EngineError::InvalidRadius(params.radius_miles));
    }
    if params.grid_size == 0 {
        return Err(EngineError::InvalidGridSize);
    }
    if !params.center_lat.is_finite() || !params.center_lng.is_finite() {
        return Err(EngineError::InvalidCenter {
            lat: params.center_lat,
            lng: params.center_lng,
        });
    }
    Ok(())
}

/// Run one grid search end to end against `source`.
///
/// At most `max_concurrent` lookups are in flight at a time
/// (`buffer_unordered`); `max_concurrent` is clamped to at least 1. The
/// radius is clamped to [`MAX_RADIUS_MILES`].
///
/// # Errors
///
/// - Validation errors per [`validate_params`], before any lookup is issued.
/// - [`EngineError::NoSuccessfulPoints`] when every point lookup failed;
///   distinct from a report whose leaderboard is simply empty.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub async fn run_grid_search<S>(
    source: &S,
    params: &SearchParams,
    max_concurrent: usize,
) -> Result<RankingReport, EngineError>
where
    S: RankingSource + Sync,
{
    validate_params(params)?;
    let radius_miles = params.radius_miles.min(MAX_RADIUS_MILES);
    let started = Instant::now();

    let points = generate_grid_points(
        params.center_lat,
        params.center_lng,
        radius_miles,
        params.grid_size,
    );
    let points_attempted = points.len() as u32;

    tracing::info!(
        term = %params.term,
        center_lat = params.center_lat,
        center_lng = params.center_lng,
        radius_miles,
        grid_size = params.grid_size,
        max_concurrent,
        "starting grid search"
    );

    let term = params.term.as_str();
    let outcomes: Vec<(GridPoint, Result<Vec<BusinessRank>, S::Error>)> =
        stream::iter(points.into_iter().map(|point| async move {
            let outcome = source.ranks_at(term, &point).await;
            (point, outcome)
        }))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut observations: Vec<PointObservation> = Vec::with_capacity(outcomes.len());
    for (point, outcome) in outcomes {
        match outcome {
            Ok(results) => observations.push(PointObservation { point, results }),
            Err(e) => {
                tracing::warn!(
                    row = point.row,
                    col = point.col,
                    lat = point.lat,
                    lng = point.lng,
                    error = %e,
                    "point lookup failed, skipping"
                );
            }
        }
    }
    // Deterministic report layout regardless of completion order.
    observations.sort_by_key(|obs| obs.point.index);

    let points_observed = observations.len() as u32;
    let businesses = aggregate_observations(&observations, points_attempted)?;

    let target = params.target.as_ref().map(|t| TargetReport {
        name: t.name.clone(),
        place_id: t.place_id.clone(),
        stats: businesses
            .iter()
            .find(|agg| {
                matches_target(
                    &BusinessRank {
                        name: agg.name.clone(),
                        place_id: agg.place_id.clone(),
                        rank: 1,
                        rating: None,
                        reviews: None,
                        address: None,
                        phone: None,
                        website: None,
                    },
                    t,
                )
            })
            .cloned(),
    });

    let report = RankingReport {
        search_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        search_term: params.term.clone(),
        center_lat: params.center_lat,
        center_lng: params.center_lng,
        city: params.city.clone(),
        state: params.state.clone(),
        radius_miles,
        grid_size: params.grid_size,
        grid: build_grid_cells(&observations, params.target.as_ref()),
        summary: ReportSummary {
            unique_businesses: businesses.len() as u32,
            points_attempted,
            points_observed,
        },
        businesses,
        target,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        from_cache: false,
    };

    tracing::info!(
        search_id = %report.search_id,
        unique_businesses = report.summary.unique_businesses,
        points_observed,
        points_attempted,
        elapsed_seconds = report.elapsed_seconds,
        "grid search complete"
    );

    Ok(report)
}

/// Cache-fronted grid search: owns a [`RankingSource`] and a [`SearchCache`].
///
/// Construct once at startup and call [`GridSearchService::shutdown`] (or
/// drop the service) to cancel the cache sweeper.
pub struct GridSearchService<S> {
    source: S,
    cache: SearchCache,
    max_concurrent: usize,
}

impl<S> GridSearchService<S>
where
    S: RankingSource + Sync,
{
    pub fn new(source: S, mut cache: SearchCache, max_concurrent: usize) -> Self {
        cache.spawn_sweeper(std::time::Duration::from_secs(60 * 60));
        Self {
            source,
            cache,
            max_concurrent,
        }
    }

    /// Like [`GridSearchService::new`] with a custom sweep interval.
    pub fn with_sweep_interval(
        source: S,
        mut cache: SearchCache,
        max_concurrent: usize,
        sweep_interval: std::time::Duration,
    ) -> Self {
        cache.spawn_sweeper(sweep_interval);
        Self {
            source,
            cache,
            max_concurrent,
        }
    }

    /// Serve a search from the cache when possible, otherwise compute and
    /// memoize it. The memoization is best-effort: a computed report is
    /// always returned to the caller.
    ///
    /// # Errors
    ///
    /// Propagates [`run_grid_search`] errors. Failed searches are never
    /// cached.
    pub async fn search(&self, params: &SearchParams) -> Result<RankingReport, EngineError> {
        let key = cache_key(params);
        if let Some(mut hit) = self.cache.get(&key) {
            hit.from_cache = true;
            return Ok(hit);
        }

        let report = run_grid_search(&self.source, params, self.max_concurrent).await?;
        self.cache.set(&key, report.clone(), None);
        Ok(report)
    }

    #[must_use]
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Cancel the cache sweep task.
    pub fn shutdown(&mut self) {
        self.cache.shutdown();
    }
}
