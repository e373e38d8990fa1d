//! HTTP client for the local-ranking lookup service.
//!
//! Wraps `reqwest` with typed response deserialization, API-level error
//! surfacing, and retry with exponential back-off on transient failures.
//! Implements [`rankgrid_engine::RankingSource`], so the engine can fan out
//! one lookup per grid point against it.

pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::{PlaceResult, RankingsResponse};
