//! Report export: one pretty JSON file with the whole report, a summary CSV,
//! and one CSV per ranked provider with its full matched-prospect list.
//! File names carry a run timestamp so repeated runs never clobber each
//! other.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;

use machmatch_engine::{MatchReport, ProviderResult};

/// Longest provider-name fragment used in a file name.
const NAME_FRAGMENT_LEN: usize = 25;

/// Writes the report files into `out_dir` and returns their paths.
///
/// # Errors
///
/// Fails when `out_dir` cannot be created or any file cannot be written.
pub fn write_report(report: &MatchReport, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut written = Vec::new();
    written.push(write_json(report, out_dir, &timestamp)?);
    written.push(write_summary_csv(report, out_dir, &timestamp)?);
    for provider in &report.top_providers {
        written.push(write_provider_csv(provider, out_dir, &timestamp)?);
    }
    Ok(written)
}

fn write_json(report: &MatchReport, out_dir: &Path, timestamp: &str) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(format!("machinery_matches_{timestamp}.json"));
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn write_summary_csv(
    report: &MatchReport,
    out_dir: &Path,
    timestamp: &str,
) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(format!("machinery_matches_summary_{timestamp}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    writer.write_record([
        "Rank",
        "Provider Name",
        "Country",
        "Coverage %",
        "Total Prospects",
        "Ideal For",
    ])?;
    for provider in &report.top_providers {
        writer.write_record([
            provider.rank.to_string(),
            provider.name.clone(),
            provider.country.clone(),
            provider.coverage_pct.to_string(),
            provider.total_prospects_matched.to_string(),
            provider.ideal_for.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_provider_csv(
    provider: &ProviderResult,
    out_dir: &Path,
    timestamp: &str,
) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(format!(
        "provider_{:02}_{}_{timestamp}.csv",
        provider.rank,
        file_name_fragment(&provider.name)
    ));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    writer.write_record([
        "Company Name",
        "Country",
        "Revenue (EUR)",
        "Website",
        "Existing Machinery",
        "Match Score",
        "Why Good Match",
    ])?;
    for prospect in &provider.matched_prospects {
        let machinery = if prospect.existing_machinery.is_empty() {
            "None detected".to_string()
        } else {
            prospect
                .existing_machinery
                .iter()
                .map(|m| m.brand.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        writer.write_record([
            prospect.name.clone(),
            prospect.country.clone(),
            prospect.revenue.to_string(),
            prospect.website.clone(),
            machinery,
            prospect.score.to_string(),
            prospect.reasons.join("; "),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Provider name reduced to a safe file-name fragment: alphanumerics kept,
/// everything else collapsed to single underscores, truncated.
fn file_name_fragment(name: &str) -> String {
    let mut fragment = String::new();
    let mut last_was_underscore = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            fragment.push(c.to_ascii_lowercase());
            last_was_underscore = false;
        } else if !last_was_underscore {
            fragment.push('_');
            last_was_underscore = true;
        }
        if fragment.len() >= NAME_FRAGMENT_LEN {
            break;
        }
    }
    fragment.trim_end_matches('_').to_string()
}
