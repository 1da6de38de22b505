//! Prospect bucketing by region and revenue size, used for reporting context.

use std::collections::BTreeMap;

use machmatch_core::Prospect;

/// Revenue at or above this is a "large" prospect.
pub const LARGE_REVENUE: f64 = 30_000_000.0;
/// Revenue at or above this (and below [`LARGE_REVENUE`]) is "medium".
pub const MEDIUM_REVENUE: f64 = 5_000_000.0;

const REGIONS: [&str; 2] = ["eu", "non_eu"];
const SIZES: [&str; 3] = ["small", "medium", "large"];

/// Returns the size band for a revenue figure: `"large"`, `"medium"`, or
/// `"small"`.
#[must_use]
pub fn size_band(revenue: f64) -> &'static str {
    if revenue >= LARGE_REVENUE {
        "large"
    } else if revenue >= MEDIUM_REVENUE {
        "medium"
    } else {
        "small"
    }
}

/// Partitions prospects into the six `{eu,non_eu} × {small,medium,large}`
/// buckets.
///
/// All six keys are always present (possibly empty), and every prospect lands
/// in exactly one bucket. Pure function: malformed revenue is already
/// defaulted to 0 at ingestion, so there are no failure modes here.
#[must_use]
pub fn categorize_prospects<'a>(
    prospects: &'a [Prospect],
    eu_country_codes: &[&str],
) -> BTreeMap<String, Vec<&'a Prospect>> {
    let mut buckets: BTreeMap<String, Vec<&Prospect>> = BTreeMap::new();
    for region in REGIONS {
        for size in SIZES {
            buckets.insert(format!("{region}_{size}"), Vec::new());
        }
    }

    for prospect in prospects {
        let region = if eu_country_codes.contains(&prospect.country.as_str()) {
            "eu"
        } else {
            "non_eu"
        };
        let key = format!("{region}_{}", size_band(prospect.revenue));
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.push(prospect);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use machmatch_core::geo::EU_COUNTRY_CODES;

    fn prospect(name: &str, country: &str, revenue: f64) -> Prospect {
        Prospect {
            name: name.to_string(),
            country: country.to_string(),
            revenue,
            website: String::new(),
            production_processes: Vec::new(),
            existing_machinery: Vec::new(),
        }
    }

    #[test]
    fn size_band_boundaries() {
        assert_eq!(size_band(30_000_000.0), "large");
        assert_eq!(size_band(29_999_999.0), "medium");
        assert_eq!(size_band(5_000_000.0), "medium");
        assert_eq!(size_band(4_999_999.0), "small");
        assert_eq!(size_band(0.0), "small");
    }

    #[test]
    fn all_six_buckets_always_present() {
        let buckets = categorize_prospects(&[], EU_COUNTRY_CODES);
        assert_eq!(buckets.len(), 6);
        for key in [
            "eu_small",
            "eu_medium",
            "eu_large",
            "non_eu_small",
            "non_eu_medium",
            "non_eu_large",
        ] {
            assert!(buckets.contains_key(key), "missing bucket {key}");
            assert!(buckets[key].is_empty());
        }
    }

    #[test]
    fn buckets_partition_the_input() {
        let prospects = vec![
            prospect("a", "DE", 50_000_000.0),
            prospect("b", "DE", 10_000_000.0),
            prospect("c", "RO", 1_000_000.0),
            prospect("d", "CH", 40_000_000.0),
            prospect("e", "US", 6_000_000.0),
            prospect("f", "", 0.0),
        ];
        let buckets = categorize_prospects(&prospects, EU_COUNTRY_CODES);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, prospects.len());

        assert_eq!(buckets["eu_large"].len(), 1);
        assert_eq!(buckets["eu_medium"].len(), 1);
        assert_eq!(buckets["eu_small"].len(), 1);
        assert_eq!(buckets["non_eu_large"].len(), 1);
        assert_eq!(buckets["non_eu_medium"].len(), 1);
        assert_eq!(buckets["non_eu_small"].len(), 1);
    }

    #[test]
    fn empty_country_is_non_eu() {
        let prospects = vec![prospect("x", "", 1_000.0)];
        let buckets = categorize_prospects(&prospects, EU_COUNTRY_CODES);
        assert_eq!(buckets["non_eu_small"].len(), 1);
    }

    #[test]
    fn prospects_keep_input_order_within_a_bucket() {
        let prospects = vec![
            prospect("first", "DE", 1.0),
            prospect("second", "FR", 1.0),
            prospect("third", "IT", 1.0),
        ];
        let buckets = categorize_prospects(&prospects, EU_COUNTRY_CODES);
        let names: Vec<&str> = buckets["eu_small"].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
