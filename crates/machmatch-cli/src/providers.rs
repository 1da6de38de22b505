//! Provider loading and the `providers` command.
//!
//! Load order: the exhibitor cache first, then a live scrape, then the
//! curated fallback list when scraping produced too few listings to be
//! useful.

use anyhow::Context;
use tracing::{info, warn};

use machmatch_cache::MatchCache;
use machmatch_core::{
    builtin_fallback_providers, load_fallback_providers, AppConfig, Provider,
};

use crate::analyze::build_directory_client;

/// A cache with more listings than this is served without re-scraping.
const CACHE_SUFFICIENT: usize = 100;
/// Below this many scraped listings the curated fallback list is used.
const MIN_EXHIBITORS: usize = 20;

/// Loads machinery providers: cache, then scrape, then the curated list.
///
/// Scrape failures degrade to the fallback list; only a broken fallback
/// file is fatal.
///
/// # Errors
///
/// Fails when the directory client cannot be built or the configured
/// fallback provider file cannot be loaded.
pub(crate) async fn load_providers(
    config: &AppConfig,
    cache: &MatchCache,
) -> anyhow::Result<Vec<Provider>> {
    let cached = match cache.exhibitors() {
        Ok(cached) => cached,
        Err(error) => {
            warn!(%error, "failed to read exhibitor cache, scraping fresh");
            Vec::new()
        }
    };
    if cached.len() > CACHE_SUFFICIENT {
        info!(count = cached.len(), "using cached exhibitor listings");
        return Ok(cached);
    }

    let scraped = match build_directory_client(config)?.scrape_exhibitors().await {
        Ok(listings) => {
            if let Err(error) = cache.put_exhibitors(&listings) {
                warn!(%error, "failed to cache scraped exhibitors");
            }
            listings
        }
        Err(error) => {
            warn!(%error, "exhibitor scrape failed");
            Vec::new()
        }
    };

    if scraped.len() >= MIN_EXHIBITORS {
        return Ok(scraped);
    }

    info!(
        scraped = scraped.len(),
        "too few scraped listings, using curated fallback providers"
    );
    fallback_providers(config)
}

fn fallback_providers(config: &AppConfig) -> anyhow::Result<Vec<Provider>> {
    match &config.fallback_providers_path {
        Some(path) => load_fallback_providers(path)
            .with_context(|| format!("failed to load fallback providers {}", path.display())),
        None => Ok(builtin_fallback_providers()),
    }
}

/// The `providers` command: force-refresh the exhibitor cache.
///
/// # Errors
///
/// Fails when the cache cannot be opened or the scrape produces nothing.
pub async fn run_providers(config: &AppConfig) -> anyhow::Result<()> {
    let cache = MatchCache::open(&config.cache_path)
        .with_context(|| format!("failed to open cache {}", config.cache_path.display()))?;

    let listings = build_directory_client(config)?
        .scrape_exhibitors()
        .await
        .context("exhibitor scrape failed")?;
    cache
        .put_exhibitors(&listings)
        .context("failed to store scraped exhibitors")?;

    println!(
        "scraped {} exhibitor listings ({} now cached)",
        listings.len(),
        cache.exhibitor_count().unwrap_or(listings.len())
    );
    Ok(())
}
