//! Fixed country-code sets used for regional bucketing and geography scoring.
//!
//! Two distinct lists are intentional and preserved from the source system:
//! the categorizer buckets prospects against the full EU membership, while the
//! geography scoring rule only awards the EU-affinity bonus for the core
//! markets the providers actually quote into.

/// EU member country codes used by the prospect categorizer.
pub const EU_COUNTRY_CODES: &[&str] = &[
    "DE", "FR", "IT", "ES", "PL", "RO", "NL", "BE", "AT", "CZ", "HU", "PT", "SE", "GR", "DK",
    "FI", "SK", "IE", "HR", "BG", "LT", "SI", "LV", "EE",
];

/// Core EU market codes used by the geography scoring rule.
pub const CORE_EU_MARKETS: &[&str] = &[
    "DE", "FR", "IT", "ES", "PL", "RO", "NL", "BE", "AT", "CZ", "HU",
];

/// Returns `true` when `country` is in the full EU membership list.
#[must_use]
pub fn is_eu_country(country: &str) -> bool {
    EU_COUNTRY_CODES.contains(&country)
}

/// Returns `true` when `country` is one of the core EU markets the
/// geography rule rewards.
#[must_use]
pub fn is_core_eu_market(country: &str) -> bool {
    CORE_EU_MARKETS.contains(&country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eu_list_contains_expected_members() {
        assert!(is_eu_country("DE"));
        assert!(is_eu_country("EE"));
        assert!(!is_eu_country("CH"));
        assert!(!is_eu_country(""));
    }

    #[test]
    fn core_markets_are_a_subset_of_the_eu_list() {
        for code in CORE_EU_MARKETS {
            assert!(is_eu_country(code), "core market {code} missing from EU list");
        }
    }

    #[test]
    fn core_markets_exclude_smaller_eu_members() {
        // SE is in the EU list but not a core market for the geography bonus.
        assert!(is_eu_country("SE"));
        assert!(!is_core_eu_market("SE"));
    }
}
