//! Wire types for the local-ranking API.

use rankgrid_engine::BusinessRank;
use serde::Deserialize;

/// Top-level response envelope. `status` is `"OK"` or `"ERROR"`; on error
/// the `error` field carries the message and `results` is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingsResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// One map-pack entry as returned by the service, ordered by rank ascending.
///
/// `rank` is optional on the wire: some response variants rely purely on
/// list order, in which case the 1-based position is used.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "review_count")]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl PlaceResult {
    /// Convert to the engine's [`BusinessRank`], defaulting a missing rank
    /// to the entry's 1-based position in the response.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn into_business_rank(self, position: usize) -> BusinessRank {
        BusinessRank {
            name: self.name,
            place_id: self.place_id,
            rank: self.rank.unwrap_or(position as u32 + 1),
            rating: self.rating,
            reviews: self.reviews,
            address: self.address,
            phone: self.phone,
            website: self.website,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rank_defaults_to_position() {
        let result = PlaceResult {
            name: "Acme Spa".to_string(),
            place_id: None,
            rank: None,
            rating: None,
            reviews: None,
            address: None,
            phone: None,
            website: None,
        };
        assert_eq!(result.into_business_rank(2).rank, 3);
    }

    #[test]
    fn explicit_rank_wins_over_position() {
        let json = r#"{"name": "Acme Spa", "rank": 7, "review_count": 12}"#;
        let result: PlaceResult = serde_json::from_str(json).unwrap();
        let rank = result.into_business_rank(0);
        assert_eq!(rank.rank, 7);
        assert_eq!(rank.reviews, Some(12));
    }

    #[test]
    fn envelope_defaults_optional_fields() {
        let json = r#"{"status": "OK"}"#;
        let response: RankingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        assert!(response.error.is_none());
        assert!(response.results.is_empty());
    }
}
