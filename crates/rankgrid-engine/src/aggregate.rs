//! Fold per-point observations into per-business summary statistics.
//!
//! Accumulation is commutative and associative per business identity, so the
//! observation order (and therefore the concurrency of the collection phase)
//! never changes the result. A business's average rank is computed over its
//! observed appearances only: absence at a point may simply mean "outside the
//! source's local search radius there" and must not act as a penalty rank.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::types::{BusinessAggregate, BusinessRank, PointObservation, PointRanking};

/// Running accumulator for one business identity.
struct Accumulator {
    name: String,
    place_id: Option<String>,
    rating: Option<f64>,
    reviews: Option<u32>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    rankings: Vec<PointRanking>,
    rank_sum: u64,
    best_rank: u32,
    worst_rank: u32,
    top3_count: u32,
    top10_count: u32,
}

impl Accumulator {
    fn new(first: &BusinessRank) -> Self {
        Self {
            name: first.name.clone(),
            place_id: first.place_id.clone(),
            rating: first.rating,
            reviews: first.reviews,
            address: first.address.clone(),
            phone: first.phone.clone(),
            website: first.website.clone(),
            rankings: Vec::new(),
            rank_sum: 0,
            best_rank: u32::MAX,
            worst_rank: 0,
            top3_count: 0,
            top10_count: 0,
        }
    }

    fn observe(&mut self, entry: &BusinessRank, ranking: PointRanking) {
        self.rankings.push(ranking);
        self.rank_sum += u64::from(entry.rank);
        self.best_rank = self.best_rank.min(entry.rank);
        self.worst_rank = self.worst_rank.max(entry.rank);
        if entry.rank <= 3 {
            self.top3_count += 1;
        }
        if entry.rank <= 10 {
            self.top10_count += 1;
        }
        // Backfill display fields the first sighting lacked.
        if self.rating.is_none() {
            self.rating = entry.rating;
        }
        if self.reviews.is_none() {
            self.reviews = entry.reviews;
        }
        if self.address.is_none() {
            self.address = entry.address.clone();
        }
        if self.phone.is_none() {
            self.phone = entry.phone.clone();
        }
        if self.website.is_none() {
            self.website = entry.website.clone();
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn finalize(self, total_grid_points: u32) -> BusinessAggregate {
        let appearances = self.rankings.len() as u32;
        let coverage = 100.0 * f64::from(appearances) / f64::from(total_grid_points.max(1));
        let avg_rank = self.rank_sum as f64 / f64::from(appearances.max(1));
        BusinessAggregate {
            name: self.name,
            place_id: self.place_id,
            rating: self.rating,
            reviews: self.reviews,
            address: self.address,
            phone: self.phone,
            website: self.website,
            rankings: self.rankings,
            appearances,
            coverage,
            avg_rank,
            best_rank: self.best_rank,
            worst_rank: self.worst_rank,
            top3_count: self.top3_count,
            top10_count: self.top10_count,
        }
    }
}

/// Identity key for the accumulator map: prefer the stable place id, fall
/// back to the normalized business name.
fn identity_key(entry: &BusinessRank) -> String {
    entry
        .place_id
        .clone()
        .unwrap_or_else(|| entry.name.trim().to_lowercase())
}

/// Fold all point observations into the sorted leaderboard.
///
/// `total_grid_points` is the intended grid size squared and includes points
/// whose lookup failed, which keeps coverage percentages comparable across
/// searches of the same grid size.
///
/// The leaderboard is ordered by coverage descending, then average rank
/// ascending (better average wins ties), then name for determinism.
///
/// # Errors
///
/// Returns [`EngineError::NoSuccessfulPoints`] when `observations` is empty,
/// so callers can distinguish total collection failure from a search that ran
/// and genuinely found nothing (`Ok` with an empty vec).
pub fn aggregate_observations(
    observations: &[PointObservation],
    total_grid_points: u32,
) -> Result<Vec<BusinessAggregate>, EngineError> {
    if observations.is_empty() {
        return Err(EngineError::NoSuccessfulPoints {
            attempted: total_grid_points,
        });
    }

    let mut accumulators: HashMap<String, Accumulator> = HashMap::new();
    for obs in observations {
        for entry in &obs.results {
            let ranking = PointRanking {
                row: obs.point.row,
                col: obs.point.col,
                lat: obs.point.lat,
                lng: obs.point.lng,
                rank: entry.rank,
            };
            accumulators
                .entry(identity_key(entry))
                .or_insert_with(|| Accumulator::new(entry))
                .observe(entry, ranking);
        }
    }

    let mut aggregates: Vec<BusinessAggregate> = accumulators
        .into_values()
        .map(|acc| acc.finalize(total_grid_points))
        .collect();

    aggregates.sort_by(|a, b| {
        b.coverage
            .total_cmp(&a.coverage)
            .then(a.avg_rank.total_cmp(&b.avg_rank))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(aggregates)
}
