//! Pure matching core: prospect categorization, pair scoring, and provider
//! coverage ranking. No I/O, no async — every function here is deterministic
//! over its inputs.

pub mod analysis;
pub mod categorize;
pub mod scorer;

pub use analysis::{rank_providers, MatchReport, MatchedProspect, ProviderResult};
pub use categorize::categorize_prospects;
pub use scorer::{calculate_match, MatchScore, TechnologyFilter};

use thiserror::Error;

/// Minimum score for a prospect to appear in a provider's matched list.
///
/// Distinct from [`SCORE_FLOOR`]: a prospect floored to 40 still falls below
/// this cutoff and is excluded from matched lists.
pub const MATCH_THRESHOLD: u32 = 50;

/// Scores below this value are lifted to exactly this value. Scores in
/// `[SCORE_FLOOR, MATCH_THRESHOLD)` are left unchanged.
pub const SCORE_FLOOR: u32 = 40;

/// Maximum number of human-readable reasons attached to one match.
pub const MAX_REASONS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Every provider was excluded before scoring (typically by the
    /// technology filter). The caller should report "nothing to match"
    /// rather than emit an empty report.
    #[error("no providers matched the requested technology filter")]
    NoMatchingProviders,
}
