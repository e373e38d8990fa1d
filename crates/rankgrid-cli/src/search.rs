//! Search command handler.
//!
//! Wires the configured ranking client and result cache into a
//! [`GridSearchService`], runs one search, and renders the output. Export
//! failures after a successful search are reported but do not fail the run.

use std::time::Duration;

use rankgrid_core::AppConfig;
use rankgrid_engine::{
    competitor_analysis_csv, grid_detail_csv, GridSearchService, SearchCache, SearchParams,
    TargetBusiness,
};
use rankgrid_places::PlacesClient;

use crate::{report, SearchArgs};

fn build_client(config: &AppConfig) -> anyhow::Result<PlacesClient> {
    let client = match &config.places_base_url {
        Some(base_url) => PlacesClient::with_base_url(
            &config.places_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            base_url,
        )
        .map_err(|e| anyhow::anyhow!("failed to build ranking client: {e}"))?,
        None => PlacesClient::new(
            &config.places_api_key,
            config.request_timeout_secs,
            &config.user_agent,
        )
        .map_err(|e| anyhow::anyhow!("failed to build ranking client: {e}"))?,
    };
    Ok(client.with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
}

pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let cache = SearchCache::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let mut service = GridSearchService::with_sweep_interval(
        client,
        cache,
        config.max_concurrent_lookups,
        Duration::from_secs(config.cache_sweep_interval_secs),
    );

    let target = args.target.map(|name| TargetBusiness {
        name,
        place_id: args.target_place_id,
    });

    let params = SearchParams {
        term: args.term,
        center_lat: args.lat,
        center_lng: args.lng,
        radius_miles: args.radius.unwrap_or(config.default_radius_miles),
        grid_size: args.grid_size.unwrap_or(config.default_grid_size),
        city: args.city,
        state: args.state,
        target,
    };

    let result = service.search(&params).await;
    service.shutdown();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_report(&report, args.top);
    }

    if let Some(path) = args.export_grid {
        std::fs::write(&path, grid_detail_csv(&report))?;
        tracing::info!(path = %path.display(), "wrote grid detail CSV");
    }
    if let Some(path) = args.export_competitors {
        std::fs::write(&path, competitor_analysis_csv(&report))?;
        tracing::info!(path = %path.display(), "wrote competitor analysis CSV");
    }

    Ok(())
}
