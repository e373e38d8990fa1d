use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it in
/// tests or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let places_api_key = require("RANKGRID_PLACES_API_KEY")?;
    let places_base_url = lookup("RANKGRID_PLACES_BASE_URL").ok();

    let env = parse_environment(&or_default("RANKGRID_ENV", "development"))?;
    let log_level = or_default("RANKGRID_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("RANKGRID_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RANKGRID_USER_AGENT", "rankgrid/0.1 (local-rank-analysis)");

    let max_concurrent_lookups = parse_usize("RANKGRID_MAX_CONCURRENT_LOOKUPS", "10")?;
    let max_retries = parse_u32("RANKGRID_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("RANKGRID_RETRY_BACKOFF_BASE_MS", "1000")?;

    // 24h TTL, 100 entries, hourly sweep.
    let cache_ttl_secs = parse_u64("RANKGRID_CACHE_TTL_SECS", "86400")?;
    let cache_capacity = parse_usize("RANKGRID_CACHE_CAPACITY", "100")?;
    let cache_sweep_interval_secs = parse_u64("RANKGRID_CACHE_SWEEP_INTERVAL_SECS", "3600")?;

    let default_grid_size = parse_u32("RANKGRID_DEFAULT_GRID_SIZE", "13")?;
    let default_radius_miles = parse_f64("RANKGRID_DEFAULT_RADIUS_MILES", "5")?;

    if max_concurrent_lookups == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKGRID_MAX_CONCURRENT_LOOKUPS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if cache_capacity == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKGRID_CACHE_CAPACITY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        max_concurrent_lookups,
        max_retries,
        retry_backoff_base_ms,
        cache_ttl_secs,
        cache_capacity,
        cache_sweep_interval_secs,
        default_grid_size,
        default_radius_miles,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RANKGRID_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("RANKGRID_PLACES_API_KEY", "test-key");
        m
    }

    #[test]
    fn fails_without_places_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RANKGRID_PLACES_API_KEY"),
            "expected MissingEnvVar(RANKGRID_PLACES_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn defaults_are_applied() {
        let map = full_env();
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_concurrent_lookups, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_ttl_secs, 86_400);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.cache_sweep_interval_secs, 3_600);
        assert_eq!(config.default_grid_size, 13);
        assert!((config.default_radius_miles - 5.0).abs() < f64::EPSILON);
        assert!(config.places_base_url.is_none());
    }

    #[test]
    fn overrides_are_respected() {
        let mut map = full_env();
        map.insert("RANKGRID_ENV", "production");
        map.insert("RANKGRID_PLACES_BASE_URL", "http://localhost:9000");
        map.insert("RANKGRID_MAX_CONCURRENT_LOOKUPS", "4");
        map.insert("RANKGRID_DEFAULT_GRID_SIZE", "7");
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(
            config.places_base_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.max_concurrent_lookups, 4);
        assert_eq!(config.default_grid_size, 7);
    }

    #[test]
    fn unknown_environment_fails() {
        let mut map = full_env();
        map.insert("RANKGRID_ENV", "staging");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RANKGRID_ENV")
        );
    }

    #[test]
    fn non_numeric_timeout_fails() {
        let mut map = full_env();
        map.insert("RANKGRID_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "RANKGRID_REQUEST_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn zero_concurrency_fails() {
        let mut map = full_env();
        map.insert("RANKGRID_MAX_CONCURRENT_LOOKUPS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. })
                if var == "RANKGRID_MAX_CONCURRENT_LOOKUPS"
        ));
    }

    #[test]
    fn zero_cache_capacity_fails() {
        let mut map = full_env();
        map.insert("RANKGRID_CACHE_CAPACITY", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RANKGRID_CACHE_CAPACITY"
        ));
    }

    #[test]
    fn redacts_api_key_in_debug() {
        let map = full_env();
        let config = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("[redacted]"));
    }
}
