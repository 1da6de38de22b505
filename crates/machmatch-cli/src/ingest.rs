//! Prospect ingestion from the CRM CSV export.
//!
//! The export uses the source system's column names: `Firma` (company),
//! `Jud` (country code), `Cifra2024EUR` (declared revenue), `Web1`
//! (website). Only `Firma` is required; everything else defaults. Rows with
//! an empty company name are skipped, and unparseable revenue becomes 0 so
//! one bad row never aborts a run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

use machmatch_core::Prospect;

const COMPANY_COLUMN: &str = "Firma";
const COUNTRY_COLUMN: &str = "Jud";
const REVENUE_COLUMN: &str = "Cifra2024EUR";
const WEBSITE_COLUMN: &str = "Web1";

/// Reads prospects from `path`, keeping at most `max_prospects` rows.
///
/// # Errors
///
/// Fails when the file cannot be opened, the CSV headers cannot be read, or
/// the `Firma` column is missing. Bad rows are skipped, not fatal.
pub fn read_prospects(path: &Path, max_prospects: Option<usize>) -> anyhow::Result<Vec<Prospect>> {
    let file =
        File::open(path).with_context(|| format!("failed to open prospects CSV {}", path.display()))?;
    let prospects = read_prospects_from(file, max_prospects)
        .with_context(|| format!("failed to read prospects CSV {}", path.display()))?;
    info!(count = prospects.len(), path = %path.display(), "prospects loaded");
    Ok(prospects)
}

fn read_prospects_from<R: Read>(
    reader: R,
    max_prospects: Option<usize>,
) -> anyhow::Result<Vec<Prospect>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers().context("failed to read CSV headers")?;
    let company_idx = find_column(headers, COMPANY_COLUMN)
        .with_context(|| format!("CSV is missing the required {COMPANY_COLUMN} column"))?;
    let country_idx = find_column(headers, COUNTRY_COLUMN).ok();
    let revenue_idx = find_column(headers, REVENUE_COLUMN).ok();
    let website_idx = find_column(headers, WEBSITE_COLUMN).ok();

    let cap = max_prospects.unwrap_or(usize::MAX);
    let mut prospects = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        if prospects.len() >= cap {
            break;
        }
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                debug!(%error, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let name = field(&record, Some(company_idx));
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        prospects.push(Prospect {
            name,
            country: field(&record, country_idx),
            revenue: parse_revenue(&field(&record, revenue_idx)),
            website: field(&record, website_idx),
            production_processes: Vec::new(),
            existing_machinery: Vec::new(),
        });
    }

    if skipped > 0 {
        debug!(skipped, "rows skipped during ingestion");
    }
    Ok(prospects)
}

/// Finds a column by name, tolerating a UTF-8 BOM glued to the first header
/// (the source system exports `utf-8-sig`).
fn find_column(headers: &csv::StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| anyhow::anyhow!("column {name} not found"))
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Declared revenue, defaulting to 0 for anything that does not parse as a
/// non-negative number.
fn parse_revenue(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(0.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Vec<Prospect> {
        read_prospects_from(csv.as_bytes(), None).unwrap()
    }

    #[test]
    fn reads_the_source_export_columns() {
        let prospects = read(
            "Firma,Jud,Cifra2024EUR,Web1\n\
             Acme Plastics,DE,2500000,https://acme.example\n\
             Plastco SRL,RO,900000,-\n",
        );
        assert_eq!(prospects.len(), 2);
        assert_eq!(prospects[0].name, "Acme Plastics");
        assert_eq!(prospects[0].country, "DE");
        assert_eq!(prospects[0].revenue, 2_500_000.0);
        assert_eq!(prospects[0].website, "https://acme.example");
        assert!(!prospects[1].has_website());
    }

    #[test]
    fn tolerates_a_byte_order_mark_before_the_first_header() {
        let prospects = read("\u{feff}Firma,Jud\nAcme,DE\n");
        assert_eq!(prospects.len(), 1);
        assert_eq!(prospects[0].name, "Acme");
    }

    #[test]
    fn handles_quoted_fields_with_commas() {
        let prospects = read("Firma,Jud\n\"Acme, Plastics & Co\",DE\n");
        assert_eq!(prospects[0].name, "Acme, Plastics & Co");
    }

    #[test]
    fn skips_rows_with_empty_company_names() {
        let prospects = read("Firma,Jud\n,DE\n  ,RO\nAcme,DE\n");
        assert_eq!(prospects.len(), 1);
        assert_eq!(prospects[0].name, "Acme");
    }

    #[test]
    fn non_numeric_revenue_becomes_zero() {
        let prospects = read("Firma,Cifra2024EUR\nA,n/a\nB,\nC,-500\nD,1234.5\n");
        assert_eq!(prospects[0].revenue, 0.0);
        assert_eq!(prospects[1].revenue, 0.0);
        assert_eq!(prospects[2].revenue, 0.0);
        assert_eq!(prospects[3].revenue, 1234.5);
    }

    #[test]
    fn missing_optional_columns_default() {
        let prospects = read("Firma\nAcme\n");
        assert_eq!(prospects[0].country, "");
        assert_eq!(prospects[0].revenue, 0.0);
        assert_eq!(prospects[0].website, "");
    }

    #[test]
    fn missing_company_column_is_an_error() {
        let result = read_prospects_from("Name,Country\nAcme,DE\n".as_bytes(), None);
        assert!(result.is_err());
    }

    #[test]
    fn max_prospects_caps_the_row_count() {
        let prospects =
            read_prospects_from("Firma\nA\nB\nC\n".as_bytes(), Some(2)).unwrap();
        assert_eq!(prospects.len(), 2);
    }

    #[test]
    fn short_rows_yield_defaults_not_errors() {
        let prospects = read("Firma,Jud,Cifra2024EUR,Web1\nAcme,DE\n");
        assert_eq!(prospects.len(), 1);
        assert_eq!(prospects[0].revenue, 0.0);
    }
}
