//! Grid point generation and coordinate math.
//!
//! Converts a (center, radius, grid size) request into a uniform row-major
//! lattice covering a square of side `2 × radius` miles. The miles→degrees
//! conversion uses the flat-earth approximation (69 miles per degree of
//! latitude, compressed by `cos(lat)` for longitude), which is accurate at
//! city scale. Extreme latitudes distort the longitude step; that is out of
//! scope for this domain and deliberately not corrected.

use serde::{Deserialize, Serialize};

use crate::types::GridPoint;

/// Approximate miles per degree of latitude, constant everywhere.
const MILES_PER_DEGREE_LAT: f64 = 69.0;

/// Approximate miles per degree of longitude at the given latitude.
fn miles_per_degree_lng(lat: f64) -> f64 {
    lat.to_radians().cos() * MILES_PER_DEGREE_LAT
}

/// Round a coordinate to 6 decimal places (≈0.11 m of precision).
fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Generate the `grid_size × grid_size` lattice around a center coordinate.
///
/// Points are emitted row-major from the north-west corner. The step between
/// adjacent points is `2 × radius / max(grid_size − 1, 1)` miles per axis, so
/// a `grid_size` of 1 places the single point exactly at the center, and an
/// odd `grid_size` puts the middle point on the center coordinate. Even grid
/// sizes are tolerated: no point lands exactly on the center.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_grid_points(
    center_lat: f64,
    center_lng: f64,
    radius_miles: f64,
    grid_size: u32,
) -> Vec<GridPoint> {
    if grid_size <= 1 {
        return vec![GridPoint {
            row: 0,
            col: 0,
            index: 0,
            lat: round6(center_lat),
            lng: round6(center_lng),
        }];
    }

    let per_degree_lng = miles_per_degree_lng(center_lat);

    // max(grid_size - 1, 1) guards against divide-by-zero on degenerate input.
    let denom = f64::from(grid_size.saturating_sub(1).max(1));
    let step_lat = (radius_miles * 2.0) / denom / MILES_PER_DEGREE_LAT;
    let step_lng = (radius_miles * 2.0) / denom / per_degree_lng;

    // North-west corner of the bounding square.
    let start_lat = center_lat + radius_miles / MILES_PER_DEGREE_LAT;
    let start_lng = center_lng - radius_miles / per_degree_lng;

    let mut points = Vec::with_capacity((grid_size * grid_size) as usize);
    for row in 0..grid_size {
        for col in 0..grid_size {
            points.push(GridPoint {
                row,
                col,
                index: row * grid_size + col,
                lat: round6(start_lat - f64::from(row) * step_lat),
                lng: round6(start_lng + f64::from(col) * step_lng),
            });
        }
    }
    points
}

/// Map zoom level appropriate for rendering a search of the given radius.
#[must_use]
pub fn zoom_level(radius_miles: f64) -> u8 {
    if radius_miles <= 2.0 {
        14
    } else if radius_miles <= 3.0 {
        13
    } else if radius_miles <= 5.0 {
        12
    } else if radius_miles <= 7.0 {
        11
    } else if radius_miles <= 10.0 {
        10
    } else {
        9
    }
}

/// Distance in miles between adjacent grid points, rounded to 2 decimals.
#[must_use]
pub fn grid_spacing_miles(radius_miles: f64, grid_size: u32) -> f64 {
    let denom = f64::from(grid_size.saturating_sub(1).max(1));
    ((radius_miles * 2.0) / denom * 100.0).round() / 100.0
}

/// Convert spacing between adjacent points back to a radius (half the span).
#[must_use]
pub fn spacing_to_radius_miles(spacing_miles: f64, grid_size: u32) -> f64 {
    let denom = f64::from(grid_size.saturating_sub(1).max(1));
    spacing_miles * denom / 2.0
}

/// Convert a radius to the spacing between adjacent points.
#[must_use]
pub fn radius_to_spacing_miles(radius_miles: f64, grid_size: u32) -> f64 {
    grid_spacing_miles(radius_miles, grid_size)
}

/// Total covered area in whole square miles: the bounding square is
/// `2 × radius` on a side.
#[must_use]
pub fn coverage_area_sq_miles(radius_miles: f64) -> f64 {
    (radius_miles * 2.0).powi(2).round()
}

#[must_use]
pub fn total_points(grid_size: u32) -> u32 {
    grid_size * grid_size
}

/// Miles to meters, for map-layer consumers.
#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * 1_609.34
}

/// Geometry summary for one grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub total_points: u32,
    pub spacing_miles: f64,
    pub coverage_area_sq_miles: f64,
    pub zoom_level: u8,
}

#[must_use]
pub fn grid_summary(grid_size: u32, radius_miles: f64) -> GridSummary {
    GridSummary {
        total_points: total_points(grid_size),
        spacing_miles: grid_spacing_miles(radius_miles, grid_size),
        coverage_area_sq_miles: coverage_area_sq_miles(radius_miles),
        zoom_level: zoom_level(radius_miles),
    }
}
