//! Provider profile resolution over the completion API.
//!
//! Providers are enriched in batches; a batch that fails in any way (HTTP
//! error, reply with no JSON array, undecodable array) is replaced by
//! degraded fallback profiles rather than aborting the run. Resolution is
//! therefore infallible at the call site — the worst case is a list of
//! fallback profiles.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use machmatch_core::{Provider, ProviderProfile, Taxonomy};

use crate::client::ProfileClient;
use crate::error::ProfilerError;

/// Providers per completion request.
const DEFAULT_BATCH_SIZE: usize = 10;
/// Hard cap on providers sent for enrichment in one run (cost control).
const DEFAULT_MAX_PROVIDERS: usize = 50;
/// Pause between completion requests.
const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 1000;

/// First `[` through last `]`, across newlines. Completion replies usually
/// wrap the array in prose, so the array is cut out rather than parsing the
/// whole reply.
static JSON_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid JSON array regex"));

/// Batched, best-effort profile resolution.
pub struct ProfileResolver {
    client: ProfileClient,
    batch_size: usize,
    max_providers: usize,
    inter_batch_delay_ms: u64,
}

impl ProfileResolver {
    /// Resolver with production pacing: batches of 10, at most 50 providers,
    /// one second between batches.
    #[must_use]
    pub fn new(client: ProfileClient) -> Self {
        Self::with_limits(
            client,
            DEFAULT_BATCH_SIZE,
            DEFAULT_MAX_PROVIDERS,
            DEFAULT_INTER_BATCH_DELAY_MS,
        )
    }

    /// Resolver with explicit batching and pacing, for configuration and
    /// tests.
    #[must_use]
    pub fn with_limits(
        client: ProfileClient,
        batch_size: usize,
        max_providers: usize,
        inter_batch_delay_ms: u64,
    ) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
            max_providers,
            inter_batch_delay_ms,
        }
    }

    /// Resolves capability profiles for `providers`, capped at the
    /// configured maximum.
    ///
    /// With a technology filter, enriched profiles are kept only when their
    /// combined technology/process text contains one of the category's
    /// taxonomy keywords. Fallback profiles from failed batches bypass the
    /// filter: a degraded record is still a usable provider.
    pub async fn resolve(
        &self,
        providers: &[Provider],
        technology_filter: Option<&str>,
        taxonomy: &Taxonomy,
    ) -> Vec<ProviderProfile> {
        let capped = &providers[..providers.len().min(self.max_providers)];
        if capped.len() < providers.len() {
            info!(
                total = providers.len(),
                cap = self.max_providers,
                "capping providers sent for enrichment"
            );
        }

        let mut profiles: Vec<ProviderProfile> = Vec::new();
        let mut first = true;
        for batch in capped.chunks(self.batch_size) {
            if !first && self.inter_batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_batch_delay_ms)).await;
            }
            first = false;

            match self.resolve_batch(batch, technology_filter).await {
                Ok(batch_profiles) => {
                    let kept = match technology_filter {
                        Some(category) => {
                            let before = batch_profiles.len();
                            let kept: Vec<ProviderProfile> = batch_profiles
                                .into_iter()
                                .filter(|p| profile_matches_category(p, category, taxonomy))
                                .collect();
                            debug!(
                                category,
                                before,
                                after = kept.len(),
                                "filtered batch by technology"
                            );
                            kept
                        }
                        None => batch_profiles,
                    };
                    profiles.extend(kept);
                }
                Err(error) => {
                    warn!(%error, batch_len = batch.len(), "enrichment batch failed, using fallback profiles");
                    profiles.extend(batch.iter().map(ProviderProfile::fallback));
                }
            }
        }

        info!(resolved = profiles.len(), "provider profiles resolved");
        profiles
    }

    async fn resolve_batch(
        &self,
        batch: &[Provider],
        technology_filter: Option<&str>,
    ) -> Result<Vec<ProviderProfile>, ProfilerError> {
        let prompt = build_prompt(batch, technology_filter)?;
        let reply = self.client.complete(&prompt).await?;
        extract_profiles(&reply, &batch_context(batch))
    }
}

fn batch_context(batch: &[Provider]) -> String {
    format!("profile batch of {}", batch.len())
}

fn build_prompt(
    batch: &[Provider],
    technology_filter: Option<&str>,
) -> Result<String, ProfilerError> {
    let batch_json = serde_json::to_string_pretty(batch).map_err(|e| {
        ProfilerError::Deserialize {
            context: batch_context(batch),
            source: e,
        }
    })?;
    let tech_context = technology_filter.map_or(String::new(), |category| {
        format!(
            "\nIMPORTANT: Focus on providers that specialize in {category}. \
             Prioritize those with strong capabilities in this technology."
        )
    });

    Ok(format!(
        r#"Analyze these machinery providers and determine their ideal customer profiles.

PROVIDERS:
{batch_json}
{tech_context}

For EACH provider, return their profile in this format:
{{
  "name": "Provider Name",
  "country": "Country",
  "tier": "budget/mid/premium",
  "technologies": ["injection molding", "extrusion", etc],
  "ideal_regions": ["EU", "Eastern Europe", etc],
  "processes": ["injection molding", "extrusion", etc],
  "key_strengths": ["strength1", "strength2", "strength3"],
  "ideal_for": "Brief description"
}}

Return as JSON array."#
    ))
}

/// Cuts the JSON array out of a completion reply and decodes it.
fn extract_profiles(reply: &str, context: &str) -> Result<Vec<ProviderProfile>, ProfilerError> {
    let array = JSON_ARRAY_RE
        .find(reply)
        .ok_or_else(|| ProfilerError::MissingArray {
            context: context.to_owned(),
        })?;
    serde_json::from_str(array.as_str()).map_err(|e| ProfilerError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Whether a profile's capability text mentions any keyword of `category`.
fn profile_matches_category(profile: &ProviderProfile, category: &str, taxonomy: &Taxonomy) -> bool {
    let combined = profile.capability_texts().collect::<Vec<_>>().join(" ");
    taxonomy.text_matches(category, &combined)
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
