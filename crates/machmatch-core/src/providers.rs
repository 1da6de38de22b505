//! Curated fallback provider list, used when the exhibitor directory scrape
//! yields too few results to be worth analyzing.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::models::{Provider, Tier};
use crate::ConfigError;

/// YAML file shape for a fallback provider list override.
#[derive(Debug, Deserialize)]
pub struct FallbackProvidersFile {
    pub providers: Vec<Provider>,
}

/// Load and validate a fallback provider list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty or duplicate provider names).
pub fn load_fallback_providers(path: &Path) -> Result<Vec<Provider>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: FallbackProvidersFile = serde_yaml::from_str(&content)?;
    validate_providers(&file.providers)?;
    Ok(file.providers)
}

fn validate_providers(providers: &[Provider]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for provider in providers {
        if provider.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(provider.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider name: '{}'",
                provider.name
            )));
        }
    }
    Ok(())
}

/// The built-in curated list of major machinery manufacturers, covering the
/// premium, mid, and budget tiers plus a few specialists.
#[must_use]
pub fn builtin_fallback_providers() -> Vec<Provider> {
    let entries: Vec<(&str, &str, Tier, Option<&str>)> = vec![
        ("ENGEL Austria GmbH", "Austria", Tier::Premium, None),
        ("Arburg GmbH + Co KG", "Germany", Tier::Premium, None),
        ("KraussMaffei Technologies GmbH", "Germany", Tier::Premium, None),
        (
            "Sumitomo (SHI) Demag Plastics Machinery",
            "Germany",
            Tier::Premium,
            None,
        ),
        ("Husky Injection Molding Systems", "Canada", Tier::Mid, None),
        ("Wittmann Battenfeld GmbH", "Austria", Tier::Mid, None),
        ("Negri Bossi SpA", "Italy", Tier::Mid, None),
        ("Milacron LLC", "USA", Tier::Mid, None),
        ("BOY Machines Inc", "Germany", Tier::Mid, None),
        ("Nissei Plastic Industrial Co", "Japan", Tier::Mid, None),
        ("Haitian International Holdings", "China", Tier::Budget, None),
        ("Chen Hsong Holdings", "Hong Kong", Tier::Budget, None),
        ("Borch Machinery", "China", Tier::Budget, None),
        ("Yizumi Precision Machinery", "China", Tier::Budget, None),
        ("Sacmi Imola", "Italy", Tier::Mid, Some("Compression molding")),
        ("Netstal Maschinen AG", "Switzerland", Tier::Premium, Some("PET")),
        ("Sandretto Industrie", "Italy", Tier::Mid, None),
        ("Tederic Machinery", "Taiwan", Tier::Budget, None),
        ("Fu Chun Shin Machinery", "Taiwan", Tier::Budget, None),
        ("Windsor Machines", "India", Tier::Budget, None),
    ];

    entries
        .into_iter()
        .map(|(name, country, tier, specialty)| Provider {
            name: name.to_string(),
            country: country.to_string(),
            tier,
            url: None,
            hall: None,
            stand: None,
            products: Vec::new(),
            specialty: specialty.map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_list_passes_validation() {
        let providers = builtin_fallback_providers();
        assert!(validate_providers(&providers).is_ok());
        assert_eq!(providers.len(), 20);
    }

    #[test]
    fn builtin_list_covers_all_tiers() {
        let providers = builtin_fallback_providers();
        for tier in [Tier::Budget, Tier::Mid, Tier::Premium] {
            assert!(
                providers.iter().any(|p| p.tier == tier),
                "no fallback provider with tier {tier}"
            );
        }
    }

    #[test]
    fn validation_rejects_duplicate_names() {
        let mut providers = builtin_fallback_providers();
        providers.push(providers[0].clone());
        assert!(matches!(
            validate_providers(&providers),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_blank_name() {
        let mut providers = builtin_fallback_providers();
        providers[0].name = "   ".to_string();
        assert!(matches!(
            validate_providers(&providers),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn yaml_parse_round_trip() {
        let yaml = r"
providers:
  - name: ENGEL Austria GmbH
    country: Austria
    tier: premium
  - name: Haitian International Holdings
    country: China
    tier: budget
";
        let file: FallbackProvidersFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.providers.len(), 2);
        assert_eq!(file.providers[0].tier, Tier::Premium);
        assert!(validate_providers(&file.providers).is_ok());
    }
}
