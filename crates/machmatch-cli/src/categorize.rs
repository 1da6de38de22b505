//! The `categorize` command: bucket a prospects CSV by region and revenue
//! size without touching the network.

use std::path::PathBuf;

use clap::Args;

use machmatch_core::geo::EU_COUNTRY_CODES;
use machmatch_engine::categorize_prospects;

use crate::ingest;

#[derive(Debug, Args)]
pub struct CategorizeArgs {
    /// Prospects CSV exported from the CRM
    #[arg(long)]
    pub prospects: PathBuf,

    /// Categorize at most this many prospects
    #[arg(long)]
    pub max_prospects: Option<usize>,
}

/// # Errors
///
/// Fails when the CSV cannot be read.
pub fn run_categorize(args: &CategorizeArgs) -> anyhow::Result<()> {
    let prospects = ingest::read_prospects(&args.prospects, args.max_prospects)?;
    let buckets = categorize_prospects(&prospects, EU_COUNTRY_CODES);

    println!("{} prospects categorized:", prospects.len());
    for (bucket, members) in &buckets {
        println!("  {bucket}: {}", members.len());
    }
    Ok(())
}
