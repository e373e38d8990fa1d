#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// API key for the local-ranking lookup service.
    pub places_api_key: String,
    /// Base URL override for the ranking service; `None` uses the client default.
    pub places_base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on in-flight per-point ranking lookups.
    pub max_concurrent_lookups: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub cache_sweep_interval_secs: u64,
    pub default_grid_size: u32,
    pub default_radius_miles: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field(
                "cache_sweep_interval_secs",
                &self.cache_sweep_interval_secs,
            )
            .field("default_grid_size", &self.default_grid_size)
            .field("default_radius_miles", &self.default_radius_miles)
            .finish()
    }
}
