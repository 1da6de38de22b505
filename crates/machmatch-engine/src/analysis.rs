//! Provider coverage ranking: scores every (prospect, provider) pair and
//! ranks providers by the share of prospects they match.

use serde::Serialize;
use tracing::debug;

use machmatch_core::{MachinerySignal, Prospect, ProviderProfile, Tier};

use crate::scorer::{calculate_match, TechnologyFilter};
use crate::{EngineError, MATCH_THRESHOLD};

/// One prospect a provider matched, with the score and reasons that put it
/// over the threshold.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchedProspect {
    pub name: String,
    pub country: String,
    pub revenue: f64,
    pub website: String,
    pub existing_machinery: Vec<MachinerySignal>,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// One ranked provider row in the report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderResult {
    /// 1-based, contiguous, assigned after sorting.
    pub rank: usize,
    pub name: String,
    pub country: String,
    pub tier: Tier,
    pub ideal_for: String,
    /// `matched / total × 100`, rounded to one decimal.
    pub coverage_pct: f64,
    pub total_prospects_matched: usize,
    pub matched_prospects: Vec<MatchedProspect>,
}

/// The full analysis output, serializable for JSON export.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchReport {
    pub total_prospects: usize,
    pub total_providers_analyzed: usize,
    pub technology_filter: Option<String>,
    pub top_providers: Vec<ProviderResult>,
}

/// Scores every prospect against every profile and returns the `top_n`
/// providers ranked by coverage.
///
/// Only prospects scoring at or above [`MATCH_THRESHOLD`] count toward a
/// provider's coverage; floored scores fall below the cutoff and are
/// excluded. An empty profile list is an error, not an empty report — the
/// caller decides how to surface "nothing matched".
///
/// # Errors
///
/// Returns [`EngineError::NoMatchingProviders`] when `profiles` is empty.
pub fn rank_providers(
    prospects: &[Prospect],
    profiles: &[ProviderProfile],
    top_n: usize,
    technology_filter: Option<&TechnologyFilter<'_>>,
) -> Result<MatchReport, EngineError> {
    if profiles.is_empty() {
        return Err(EngineError::NoMatchingProviders);
    }

    let total = prospects.len();
    let mut results: Vec<ProviderResult> = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let mut matched: Vec<MatchedProspect> = Vec::new();
        for prospect in prospects {
            let outcome = calculate_match(prospect, profile, technology_filter);
            if outcome.score >= MATCH_THRESHOLD {
                matched.push(MatchedProspect {
                    name: prospect.name.clone(),
                    country: prospect.country.clone(),
                    revenue: prospect.revenue,
                    website: prospect.website.clone(),
                    existing_machinery: prospect.existing_machinery.clone(),
                    score: outcome.score,
                    reasons: outcome.reasons,
                });
            }
        }

        let coverage_pct = if total == 0 {
            0.0
        } else {
            let raw = matched.len() as f64 / total as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        };
        debug!(
            provider = %profile.name,
            matched = matched.len(),
            coverage_pct,
            "scored provider"
        );

        results.push(ProviderResult {
            rank: 0,
            name: profile.name.clone(),
            country: profile.country.clone(),
            tier: profile.tier,
            ideal_for: profile.ideal_for.clone(),
            coverage_pct,
            total_prospects_matched: matched.len(),
            matched_prospects: matched,
        });
    }

    // Stable sort keeps the profile-resolution order on coverage ties.
    results.sort_by(|a, b| {
        b.coverage_pct
            .partial_cmp(&a.coverage_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(top_n);
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index + 1;
    }

    Ok(MatchReport {
        total_prospects: total,
        total_providers_analyzed: profiles.len(),
        technology_filter: technology_filter.map(|f| f.category.to_string()),
        top_providers: results,
    })
}
