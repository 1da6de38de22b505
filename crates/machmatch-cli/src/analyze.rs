//! The `analyze` command: the full matching pipeline from prospects CSV to
//! exported report files.
//!
//! Per-prospect enrichment failures are logged and skipped rather than
//! propagated so one unreachable website does not abort a 1500-prospect run.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use machmatch_cache::MatchCache;
use machmatch_core::geo::EU_COUNTRY_CODES;
use machmatch_core::{AppConfig, Prospect, Provider, ProviderProfile, Taxonomy};
use machmatch_engine::{
    categorize_prospects, rank_providers, EngineError, MatchReport, TechnologyFilter,
};
use machmatch_profiler::{ProfileClient, ProfileResolver};
use machmatch_scraper::DirectoryClient;

use crate::{export, ingest, providers::load_providers};

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Prospects CSV exported from the CRM
    #[arg(long)]
    pub prospects: PathBuf,

    /// How many top providers to rank
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// Restrict matching to one technology category
    #[arg(long)]
    pub technology: Option<String>,

    /// Analyze at most this many prospects
    #[arg(long)]
    pub max_prospects: Option<usize>,

    /// Scan prospect websites for machinery brands (slow for large runs)
    #[arg(long)]
    pub detect_machinery: bool,

    /// Print what would run without network calls or writes
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for report files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Runs the full pipeline: ingest, provider loading, enrichment, profile
/// resolution, ranking, and export.
///
/// # Errors
///
/// Fails on unusable input (missing CSV, unknown technology category) and
/// on cache-open failure. Enrichment and scraping problems degrade instead.
pub async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let taxonomy = load_taxonomy(config)?;
    if let Some(category) = &args.technology {
        if !taxonomy.contains(category) {
            let known: Vec<&str> = taxonomy.category_names().collect();
            anyhow::bail!(
                "unknown technology category '{category}'; known categories: {}",
                known.join(", ")
            );
        }
    }

    if args.dry_run {
        println!(
            "dry-run: would analyze {} (max {}) against providers from {}, \
             technology filter {}, top {} providers, reports into {}",
            args.prospects.display(),
            args.max_prospects
                .map_or_else(|| "all".to_string(), |n| n.to_string()),
            config.directory_base_url,
            args.technology.as_deref().unwrap_or("none"),
            args.top_n,
            args.out_dir.display()
        );
        return Ok(());
    }

    let mut prospects = ingest::read_prospects(&args.prospects, args.max_prospects)?;
    if prospects.is_empty() {
        println!("no usable prospects in {}; nothing to analyze", args.prospects.display());
        return Ok(());
    }

    let cache = MatchCache::open(&config.cache_path)
        .with_context(|| format!("failed to open cache {}", config.cache_path.display()))?;

    let providers = load_providers(config, &cache).await?;
    println!("{} machinery providers loaded", providers.len());

    enrich_prospects(config, &cache, &mut prospects, args.detect_machinery).await?;

    let buckets = categorize_prospects(&prospects, EU_COUNTRY_CODES);
    for (bucket, members) in &buckets {
        info!(bucket, count = members.len(), "prospect bucket");
    }

    let profiles = resolve_profiles(config, &providers, args.technology.as_deref(), &taxonomy).await?;

    let filter = args.technology.as_deref().map(|category| TechnologyFilter {
        category,
        taxonomy: &taxonomy,
    });
    let report = match rank_providers(&prospects, &profiles, args.top_n, filter.as_ref()) {
        Ok(report) => report,
        Err(EngineError::NoMatchingProviders) => {
            println!(
                "no providers matched the requested technology filter; nothing to report"
            );
            return Ok(());
        }
    };

    print_summary(&report);

    let written = export::write_report(&report, &args.out_dir)?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn load_taxonomy(config: &AppConfig) -> anyhow::Result<Taxonomy> {
    match &config.taxonomy_path {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("failed to load taxonomy {}", path.display())),
        None => Ok(Taxonomy::builtin()),
    }
}

/// Fills in cached enrichment and, when requested, scans prospect websites
/// for machinery brands. Failures degrade to the un-enriched prospect.
async fn enrich_prospects(
    config: &AppConfig,
    cache: &MatchCache,
    prospects: &mut [Prospect],
    detect_machinery: bool,
) -> anyhow::Result<()> {
    let scanner = if detect_machinery {
        Some(build_directory_client(config)?)
    } else {
        None
    };

    let mut cached_hits = 0usize;
    let mut scanned = 0usize;
    for prospect in prospects.iter_mut() {
        if !prospect.has_website() {
            continue;
        }
        let url = prospect.website.clone();

        match cache.get_prospect(&url) {
            Ok(Some(cached)) => {
                *prospect = cached;
                cached_hits += 1;
                continue;
            }
            Ok(None) => {}
            Err(error) => warn!(url, %error, "cache read failed, treating as miss"),
        }

        if let Some(client) = &scanner {
            match client.detect_machinery(&url).await {
                Ok(signals) => {
                    prospect.existing_machinery = signals;
                    scanned += 1;
                }
                Err(error) => {
                    warn!(url, %error, "machinery detection failed, skipping prospect site");
                }
            }
            if let Err(error) = cache.put_prospect(&url, prospect) {
                warn!(url, %error, "failed to cache enriched prospect");
            }
        }
    }

    info!(cached_hits, scanned, "prospect enrichment finished");
    Ok(())
}

async fn resolve_profiles(
    config: &AppConfig,
    providers: &[Provider],
    technology_filter: Option<&str>,
    taxonomy: &Taxonomy,
) -> anyhow::Result<Vec<ProviderProfile>> {
    let Some(api_key) = &config.profiler_api_key else {
        warn!("no API key configured, using fallback profiles for every provider");
        return Ok(providers.iter().map(ProviderProfile::fallback).collect());
    };

    let client = ProfileClient::with_base_url(
        &config.profiler_base_url,
        api_key,
        &config.profiler_model,
        config.profiler_timeout_secs,
    )?;
    let resolver = ProfileResolver::with_limits(
        client,
        config.profiler_batch_size,
        config.profiler_max_providers,
        1000,
    );
    Ok(resolver.resolve(providers, technology_filter, taxonomy).await)
}

pub(crate) fn build_directory_client(config: &AppConfig) -> anyhow::Result<DirectoryClient> {
    DirectoryClient::with_base_url(
        &config.directory_base_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
        config.scraper_inter_request_delay_ms,
    )
    .context("failed to build directory client")
}

fn print_summary(report: &MatchReport) {
    println!(
        "top {} providers across {} prospects ({} providers analyzed)",
        report.top_providers.len(),
        report.total_prospects,
        report.total_providers_analyzed
    );
    if let Some(filter) = &report.technology_filter {
        println!("technology filter: {filter}");
    }
    for provider in &report.top_providers {
        println!(
            "#{} {} ({}) — coverage {}% ({} prospects), ideal for: {}",
            provider.rank,
            provider.name,
            provider.country,
            provider.coverage_pct,
            provider.total_prospects_matched,
            provider.ideal_for
        );
    }
}
