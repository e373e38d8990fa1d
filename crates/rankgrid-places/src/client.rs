//! The ranking lookup client.

use std::time::Duration;

use rankgrid_engine::{BusinessRank, GridPoint, RankingSource};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::RankingsResponse;

const DEFAULT_BASE_URL: &str = "https://api.localrank.dev/";

/// Client for the local-ranking lookup API.
///
/// Manages the HTTP client, API key, base URL, and retry policy. Use
/// [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a new client pointed at the production ranking API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock, or a self-hosted lookup service).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so path joins hit the root
        // rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Override the retry policy (default: 3 retries, 1 s base back-off).
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches the ordered map-pack for one coordinate, retrying transient
    /// failures per the configured policy.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the API returns `"status": "ERROR"`.
    /// - [`PlacesError::Http`] on network failure or a non-2xx status after
    ///   retries are exhausted.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn rankings_at(
        &self,
        term: &str,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<BusinessRank>, PlacesError> {
        let url = self.build_url(term, lat, lng);
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_rankings(&url)
        })
        .await
    }

    /// Builds the lookup URL with percent-encoded query parameters.
    fn build_url(&self, term: &str, lat: f64, lng: f64) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("v1/rankings");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("term", term);
            pairs.append_pair("lat", &lat.to_string());
            pairs.append_pair("lng", &lng.to_string());
        }
        url
    }

    /// Single lookup attempt: GET, assert 2xx, parse the typed envelope,
    /// surface API-level errors, and convert entries to [`BusinessRank`].
    async fn fetch_rankings(&self, url: &Url) -> Result<Vec<BusinessRank>, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let envelope: RankingsResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if envelope.status == "ERROR" {
            return Err(PlacesError::ApiError(
                envelope.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }

        Ok(envelope
            .results
            .into_iter()
            .enumerate()
            .map(|(idx, result)| result.into_business_rank(idx))
            .collect())
    }
}

impl RankingSource for PlacesClient {
    type Error = PlacesError;

    async fn ranks_at(
        &self,
        term: &str,
        point: &GridPoint,
    ) -> Result<Vec<BusinessRank>, PlacesError> {
        self.rankings_at(term, point.lat, point.lng).await
    }
}
