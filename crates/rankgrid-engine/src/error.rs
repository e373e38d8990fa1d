use thiserror::Error;

/// Errors produced by grid search validation and aggregation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The search term was empty or whitespace-only.
    #[error("search term must not be empty")]
    EmptyTerm,

    /// The search radius was zero, negative, or not finite.
    #[error("radius must be a positive number of miles, got {0}")]
    InvalidRadius(f64),

    /// The grid dimension was zero.
    #[error("grid size must be at least 1")]
    InvalidGridSize,

    /// The center coordinate was missing or not finite.
    #[error("center coordinate is not a finite lat/lng pair: ({lat}, {lng})")]
    InvalidCenter { lat: f64, lng: f64 },

    /// Every grid point failed to produce an observation. Distinct from a
    /// successful search that found no businesses anywhere.
    #[error("no grid point returned ranking data ({attempted} points attempted)")]
    NoSuccessfulPoints { attempted: u32 },
}
