//! Weighted-rule scoring for one (prospect, provider) pair.
//!
//! Rules are additive and evaluated in a fixed order with no early exit; the
//! reason list is assembled in evaluation order and capped at
//! [`crate::MAX_REASONS`]. The scorer never fails: every input field is
//! optional with a default applied upstream.

use machmatch_core::geo::is_core_eu_market;
use machmatch_core::{Prospect, ProviderProfile, Taxonomy, Tier};

use crate::{MATCH_THRESHOLD, MAX_REASONS, SCORE_FLOOR};

/// Points for a technology match on both sides of the pair.
const TECH_BOTH_POINTS: u32 = 35;
/// Points when only the provider carries the filtered technology.
const TECH_PROVIDER_POINTS: u32 = 20;
/// Points for a revenue/tier alignment.
const TIER_MATCH_POINTS: u32 = 30;
/// Baseline points for mid-tier providers outside their sweet spot.
const MID_TIER_BASELINE_POINTS: u32 = 15;
/// Points for same-country pairs.
const SAME_COUNTRY_POINTS: u32 = 20;
/// Points for an EU provider serving a core EU market.
const EU_AFFINITY_POINTS: u32 = 15;
/// Points for providers with global reach.
const GLOBAL_REACH_POINTS: u32 = 10;
/// Points when the provider is already installed at the prospect.
const EXISTING_CUSTOMER_POINTS: u32 = 10;
/// Points when the prospect runs budget-brand machinery (upgrade target).
const UPGRADE_OPPORTUNITY_POINTS: u32 = 15;

/// Revenue thresholds for the tier-alignment rule.
const PREMIUM_MIN_REVENUE: f64 = 30_000_000.0;
const MID_MIN_REVENUE: f64 = 5_000_000.0;
const BUDGET_MAX_REVENUE: f64 = 10_000_000.0;

/// Machinery brands that mark a prospect as an upgrade opportunity.
const BUDGET_BRANDS: [&str; 2] = ["Haitian", "Chen Hsong"];

/// An active technology filter: the category key plus the taxonomy that
/// defines its keywords.
#[derive(Debug, Clone, Copy)]
pub struct TechnologyFilter<'a> {
    pub category: &'a str,
    pub taxonomy: &'a Taxonomy,
}

/// Score and reasons for one (prospect, provider) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    /// Always ≥ [`SCORE_FLOOR`].
    pub score: u32,
    /// At most [`MAX_REASONS`] entries, in rule-evaluation order.
    pub reasons: Vec<String>,
}

/// Computes the compatibility score for one (prospect, provider) pair.
///
/// Rule order: technology (filter only), revenue/tier, geography, existing
/// machinery, then the floor. See the module docs for the point values.
///
/// The floor lifts scores below [`SCORE_FLOOR`] to exactly [`SCORE_FLOOR`];
/// scores in `[SCORE_FLOOR, MATCH_THRESHOLD)` are deliberately left as-is.
/// The floor value (40) sitting below the match threshold (50) is inherited
/// source-system behavior, pinned by regression test.
#[must_use]
pub fn calculate_match(
    prospect: &Prospect,
    profile: &ProviderProfile,
    technology_filter: Option<&TechnologyFilter<'_>>,
) -> MatchScore {
    let mut score: u32 = 0;
    let mut reasons: Vec<String> = Vec::new();

    // Technology matching, high priority when a filter is set. A prospect
    // with no recognizable process text is not disqualified; it just earns
    // nothing here and is scored on the remaining axes.
    if let Some(filter) = technology_filter {
        let prospect_has_tech = prospect
            .production_processes
            .iter()
            .any(|process| filter.taxonomy.text_matches(filter.category, process));
        let provider_has_tech = profile
            .capability_texts()
            .any(|tech| filter.taxonomy.text_matches(filter.category, tech));

        if prospect_has_tech && provider_has_tech {
            score += TECH_BOTH_POINTS;
            reasons.push(format!("Both use {} technology", filter.category));
        } else if provider_has_tech {
            score += TECH_PROVIDER_POINTS;
            reasons.push(format!("Provider specializes in {}", filter.category));
        }
    }

    // Revenue / tier alignment.
    match profile.tier {
        Tier::Premium if prospect.revenue >= PREMIUM_MIN_REVENUE => {
            score += TIER_MATCH_POINTS;
            reasons.push("Revenue matches premium tier".to_string());
        }
        Tier::Mid if (MID_MIN_REVENUE..PREMIUM_MIN_REVENUE).contains(&prospect.revenue) => {
            score += TIER_MATCH_POINTS;
            reasons.push("Revenue matches mid-range tier".to_string());
        }
        Tier::Budget if prospect.revenue < BUDGET_MAX_REVENUE => {
            score += TIER_MATCH_POINTS;
            reasons.push("Revenue matches budget tier".to_string());
        }
        // Mid-range providers can serve most prospects; baseline bonus,
        // no reason text.
        Tier::Mid => score += MID_TIER_BASELINE_POINTS,
        _ => {}
    }

    // Geography.
    if !prospect.country.is_empty() && prospect.country == profile.country {
        score += SAME_COUNTRY_POINTS;
        reasons.push(format!("Same country ({})", prospect.country));
    } else if is_core_eu_market(&prospect.country)
        && profile.ideal_regions.iter().any(|r| r == "EU")
    {
        score += EU_AFFINITY_POINTS;
        reasons.push("EU provider for EU prospect".to_string());
    } else if profile.ideal_regions.iter().any(|r| r == "Global") {
        score += GLOBAL_REACH_POINTS;
    }

    // Existing machinery signal. The two branches are mutually exclusive;
    // an existing install of this provider outranks the upgrade signal.
    if !prospect.existing_machinery.is_empty() {
        let brands: Vec<&str> = prospect
            .existing_machinery
            .iter()
            .map(|m| m.brand.as_str())
            .collect();
        let joined = brands.join(" ");
        if joined.contains(&profile.name) {
            score += EXISTING_CUSTOMER_POINTS;
            reasons.push("Already customer (expansion opportunity)".to_string());
        } else if brands.iter().any(|b| BUDGET_BRANDS.contains(b)) {
            score += UPGRADE_OPPORTUNITY_POINTS;
            reasons.push("Has budget brand (upgrade opportunity)".to_string());
        }
    }

    // Floor: only scores below SCORE_FLOOR are lifted, and only to
    // SCORE_FLOOR itself.
    if score < MATCH_THRESHOLD {
        score = score.max(SCORE_FLOOR);
    }

    reasons.truncate(MAX_REASONS);
    MatchScore { score, reasons }
}
