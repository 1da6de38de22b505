use serde::{Deserialize, Serialize};

/// Market positioning bucket for a machinery provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Budget,
    Mid,
    Premium,
}

impl Default for Tier {
    /// Mid is the default when a listing carries no tier information —
    /// mid-range providers can serve most prospects.
    fn default() -> Self {
        Tier::Mid
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Budget => write!(f, "budget"),
            Tier::Mid => write!(f, "mid"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// How confident the website scan was about a detected machinery brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A machinery brand detected on a prospect's website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinerySignal {
    pub brand: String,
    pub confidence: Confidence,
}

/// A candidate customer company being evaluated for potential machinery
/// purchase. Read-only input for a single scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    /// Company name; the identity key. Non-empty (empty rows are dropped at
    /// ingestion).
    pub name: String,
    /// ISO-ish country code. May be empty when the source row had none.
    #[serde(default)]
    pub country: String,
    /// Declared annual revenue in EUR. Non-numeric source values become 0.
    #[serde(default)]
    pub revenue: f64,
    /// Company website. May be a placeholder like `"-"`.
    #[serde(default)]
    pub website: String,
    /// Free-text production process descriptions, in source order.
    #[serde(default)]
    pub production_processes: Vec<String>,
    /// Machinery brands detected on the prospect's website, if scanning ran.
    #[serde(default)]
    pub existing_machinery: Vec<MachinerySignal>,
}

impl Prospect {
    /// Returns `true` when the website field holds a usable URL rather than
    /// an empty string or the `"-"` placeholder the source exports use.
    #[must_use]
    pub fn has_website(&self) -> bool {
        !self.website.is_empty() && self.website != "-"
    }
}

/// A machinery manufacturer as listed in the exhibitor directory or the
/// curated fallback file, before profile enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hall: Option<String>,
    #[serde(default)]
    pub stand: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub specialty: Option<String>,
}

/// A provider's capability profile as returned by the enrichment boundary.
///
/// The resolver is best-effort: when enrichment fails for a batch, each
/// provider in it gets the degraded profile from [`ProviderProfile::fallback`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub processes: Vec<String>,
    #[serde(default)]
    pub ideal_regions: Vec<String>,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub ideal_for: String,
}

impl ProviderProfile {
    /// Generic profile used when enrichment fails for a provider's batch.
    #[must_use]
    pub fn fallback(provider: &Provider) -> Self {
        ProviderProfile {
            name: provider.name.clone(),
            country: provider.country.clone(),
            tier: provider.tier,
            technologies: vec!["general".to_string()],
            processes: Vec::new(),
            ideal_regions: vec!["EU".to_string()],
            key_strengths: vec!["Quality machinery".to_string()],
            ideal_for: "General manufacturing".to_string(),
        }
    }

    /// All capability text for this provider: technologies followed by
    /// processes. The scorer and the technology filter both test against
    /// this combined list.
    #[must_use]
    pub fn capability_texts(&self) -> impl Iterator<Item = &str> {
        self.technologies
            .iter()
            .chain(self.processes.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str) -> Provider {
        Provider {
            name: name.to_string(),
            country: "Austria".to_string(),
            tier: Tier::Premium,
            url: None,
            hall: None,
            stand: None,
            products: Vec::new(),
            specialty: None,
        }
    }

    #[test]
    fn tier_defaults_to_mid() {
        assert_eq!(Tier::default(), Tier::Mid);
    }

    #[test]
    fn tier_display() {
        assert_eq!(Tier::Budget.to_string(), "budget");
        assert_eq!(Tier::Mid.to_string(), "mid");
        assert_eq!(Tier::Premium.to_string(), "premium");
    }

    #[test]
    fn tier_deserializes_lowercase() {
        let tier: Tier = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(tier, Tier::Premium);
    }

    #[test]
    fn prospect_missing_fields_default() {
        let prospect: Prospect = serde_json::from_str(r#"{"name": "Acme Plastics"}"#).unwrap();
        assert_eq!(prospect.name, "Acme Plastics");
        assert_eq!(prospect.country, "");
        assert_eq!(prospect.revenue, 0.0);
        assert!(prospect.production_processes.is_empty());
        assert!(prospect.existing_machinery.is_empty());
    }

    #[test]
    fn has_website_rejects_placeholder() {
        let mut prospect: Prospect = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert!(!prospect.has_website());
        prospect.website = "-".to_string();
        assert!(!prospect.has_website());
        prospect.website = "https://acme.example".to_string();
        assert!(prospect.has_website());
    }

    #[test]
    fn fallback_profile_carries_listing_identity() {
        let profile = ProviderProfile::fallback(&listing("ENGEL Austria GmbH"));
        assert_eq!(profile.name, "ENGEL Austria GmbH");
        assert_eq!(profile.country, "Austria");
        assert_eq!(profile.tier, Tier::Premium);
        assert_eq!(profile.technologies, vec!["general"]);
        assert_eq!(profile.ideal_regions, vec!["EU"]);
        assert_eq!(profile.key_strengths, vec!["Quality machinery"]);
        assert_eq!(profile.ideal_for, "General manufacturing");
    }

    #[test]
    fn capability_texts_chains_technologies_and_processes() {
        let profile = ProviderProfile {
            name: "Test".to_string(),
            country: String::new(),
            tier: Tier::Mid,
            technologies: vec!["injection molding".to_string()],
            processes: vec!["extrusion".to_string()],
            ideal_regions: Vec::new(),
            key_strengths: Vec::new(),
            ideal_for: String::new(),
        };
        let texts: Vec<&str> = profile.capability_texts().collect();
        assert_eq!(texts, vec!["injection molding", "extrusion"]);
    }

    #[test]
    fn profile_deserializes_with_missing_optional_fields() {
        let profile: ProviderProfile =
            serde_json::from_str(r#"{"name": "Arburg", "tier": "premium"}"#).unwrap();
        assert_eq!(profile.name, "Arburg");
        assert_eq!(profile.tier, Tier::Premium);
        assert!(profile.technologies.is_empty());
        assert_eq!(profile.ideal_for, "");
    }
}
