//! Technology taxonomy: ordered categories of plastics-processing
//! technologies, each with an ordered keyword list.
//!
//! Classification is first-match-wins in **declared order**. Some keywords are
//! substrings of others across categories (e.g. "foam injection" appears under
//! both injection and foaming); the declaration order is the tiebreak and is
//! treated as configuration, not as an inferred priority. Callers that need a
//! different precedence reorder the category list, never the matching logic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One technology category: an identifier key, a user-facing label, and the
/// keyword synonyms that map free text into the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, e.g. `"injection"` or `"blow_molding"`.
    pub name: String,
    /// User-facing label, e.g. `"Injection Molding (all types)"`.
    pub display_name: String,
    /// Keyword synonyms, matched as case-insensitive substrings.
    pub keywords: Vec<String>,
}

/// YAML file shape for a taxonomy override.
#[derive(Debug, Deserialize)]
pub struct TaxonomyFile {
    pub categories: Vec<Category>,
}

/// The configured technology taxonomy. Built once at startup and passed by
/// reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Builds a taxonomy from an explicit category list, validating it and
    /// pre-lowercasing every keyword so matching never re-allocates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for empty category names, duplicate
    /// category names, or categories with no keywords.
    pub fn from_categories(mut categories: Vec<Category>) -> Result<Self, ConfigError> {
        validate_categories(&categories)?;
        for category in &mut categories {
            for keyword in &mut category.keywords {
                *keyword = keyword.to_lowercase();
            }
        }
        Ok(Taxonomy { categories })
    }

    /// Loads a taxonomy override from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: TaxonomyFile = serde_yaml::from_str(&content)?;
        Self::from_categories(file.categories)
    }

    /// The built-in taxonomy covering the thirteen plastics-processing
    /// technology families tracked by the exhibitor directory.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = builtin_categories()
            .into_iter()
            .map(|(name, display_name, keywords)| Category {
                name: name.to_string(),
                display_name: display_name.to_string(),
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        // Builtin data is validated by test; skip the runtime pass.
        Taxonomy { categories }
    }

    /// Classifies free text into the first configured category any of whose
    /// keywords is a case-insensitive substring of the text.
    ///
    /// Returns `None` when no keyword matches.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|c| c.name.as_str())
    }

    /// The keyword list for a category, or `None` for an unknown category.
    #[must_use]
    pub fn keywords_for(&self, category: &str) -> Option<&[String]> {
        self.find(category).map(|c| c.keywords.as_slice())
    }

    /// User-facing label for a category, or `None` for an unknown category.
    #[must_use]
    pub fn display_name(&self, category: &str) -> Option<&str> {
        self.find(category).map(|c| c.display_name.as_str())
    }

    /// Returns `true` when any keyword of `category` is a case-insensitive
    /// substring of `text`. Unknown categories never match.
    #[must_use]
    pub fn text_matches(&self, category: &str, text: &str) -> bool {
        let Some(keywords) = self.keywords_for(category) else {
            return false;
        };
        let lower = text.to_lowercase();
        keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Category identifiers in declared order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Returns `true` when `category` is a configured category identifier.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.find(category).is_some()
    }

    fn find(&self, category: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == category)
    }
}

fn validate_categories(categories: &[Category]) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();
    for category in categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
        if category.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no keywords",
                category.name
            )));
        }
    }
    Ok(())
}

/// The built-in category data: (name, display name, keywords).
///
/// Keyword lists carry all observed variations and subtypes from the
/// exhibitor directory's product descriptions.
#[allow(clippy::too_many_lines)]
fn builtin_categories() -> Vec<(&'static str, &'static str, &'static [&'static str])> {
    vec![
        (
            "injection",
            "Injection Molding (all types)",
            &[
                "injection molding",
                "injection moulding",
                "injection",
                "IMM",
                "plastic injection",
                "insert molding",
                "overmolding",
                "overmoulding",
                "two-shot molding",
                "2-shot molding",
                "multi-shot",
                "co-injection",
                "gas-assisted injection",
                "water-assisted injection",
                "foam injection",
                "thin-wall injection",
                "micro injection",
                "micro-molding",
                "vertical injection",
                "horizontal injection",
                "toggle injection",
                "hydraulic injection",
                "electric injection",
                "hybrid injection",
                "LSR injection",
                "liquid silicone",
                "rubber injection",
                "reaction injection",
                "RIM",
                "structural foam",
                "MuCell",
            ],
        ),
        (
            "extrusion",
            "Extrusion (all types)",
            &[
                "extrusion",
                "extruder",
                "profile extrusion",
                "pipe extrusion",
                "film extrusion",
                "blown film",
                "cast film",
                "sheet extrusion",
                "flat die extrusion",
                "coextrusion",
                "co-extrusion",
                "multilayer",
                "wire coating",
                "cable extrusion",
                "tube extrusion",
                "hose extrusion",
                "compounding",
                "twin-screw",
                "single-screw",
                "counter-rotating",
                "window profile",
                "PVC extrusion",
                "WPC extrusion",
                "foam extrusion",
                "extrusion coating",
                "extrusion lamination",
                "strand pelletizing",
            ],
        ),
        (
            "blow_molding",
            "Blow Molding (PET, HDPE, all types)",
            &[
                "blow molding",
                "blow moulding",
                "blowing",
                "bottle blowing",
                "extrusion blow molding",
                "EBM",
                "injection blow molding",
                "IBM",
                "stretch blow molding",
                "SBM",
                "ISBM",
                "injection stretch",
                "PET blow",
                "preform",
                "preform injection",
                "bottle production",
                "container blowing",
                "HDPE bottle",
                "multilayer blow",
                "3D blow molding",
                "shuttle blow",
                "continuous blow",
                "accumulator head",
                "rotary blow",
                "linear blow",
            ],
        ),
        (
            "thermoforming",
            "Thermoforming & Vacuum Forming",
            &[
                "thermoforming",
                "vacuum forming",
                "pressure forming",
                "twin-sheet thermoforming",
                "plug-assist",
                "drape forming",
                "matched mold",
                "forming",
                "vacuum thermoform",
                "blister pack",
                "clamshell",
                "deep draw",
                "skin packaging",
                "roll-fed thermoform",
            ],
        ),
        (
            "compression",
            "Compression & Transfer Molding",
            &[
                "compression molding",
                "compression moulding",
                "compression press",
                "SMC",
                "BMC",
                "sheet molding compound",
                "bulk molding compound",
                "GMT",
                "glass mat thermoplastic",
                "transfer molding",
                "resin transfer molding",
                "RTM",
                "compression thermoset",
                "rubber compression",
                "silicone compression",
            ],
        ),
        (
            "rotomolding",
            "Rotational Molding",
            &[
                "rotational molding",
                "rotomolding",
                "rotomoulding",
                "roto molding",
                "rotocasting",
                "carousel molding",
                "rock and roll",
                "shuttle rotomolding",
                "rotational casting",
            ],
        ),
        (
            "film_sheet",
            "Film & Sheet Production",
            &[
                "film production",
                "film blowing",
                "film casting",
                "sheet production",
                "sheet casting",
                "calendering",
                "film stretching",
                "BOPP",
                "BOPET",
                "biaxial orientation",
                "monolayer film",
                "multilayer film",
                "barrier film",
                "stretch film",
                "shrink film",
                "packaging film",
            ],
        ),
        (
            "foaming",
            "Foam Manufacturing",
            &[
                "foam molding",
                "foam injection",
                "expanded polystyrene",
                "EPS",
                "XPS",
                "extruded polystyrene",
                "polyurethane foam",
                "PU foam",
                "foam extrusion",
                "microcellular foam",
                "structural foam",
                "bead foaming",
                "EPP",
                "EPE",
                "foam manufacturing",
            ],
        ),
        (
            "composites",
            "Composites & Pultrusion",
            &[
                "pultrusion",
                "filament winding",
                "hand layup",
                "spray up",
                "resin infusion",
                "vacuum infusion",
                "autoclave molding",
                "prepreg",
                "composite manufacturing",
                "fiber reinforced",
                "glass fiber",
                "carbon fiber",
                "FRP",
                "GFRP",
                "CFRP",
            ],
        ),
        (
            "additive",
            "3D Printing & Additive Manufacturing",
            &[
                "3D printing",
                "additive manufacturing",
                "FDM",
                "FFF",
                "SLA",
                "SLS",
                "stereolithography",
                "selective laser",
                "material jetting",
                "binder jetting",
                "powder bed fusion",
                "fused deposition",
                "rapid prototyping",
                "AM",
            ],
        ),
        (
            "welding",
            "Plastic Welding & Assembly",
            &[
                "ultrasonic welding",
                "vibration welding",
                "hot plate welding",
                "laser welding",
                "infrared welding",
                "spin welding",
                "friction welding",
                "plastic welding",
                "heat staking",
                "ultrasonic insertion",
                "assembly",
            ],
        ),
        (
            "recycling",
            "Recycling & Compounding",
            &[
                "recycling",
                "regranulation",
                "agglomeration",
                "densification",
                "wash line",
                "flake production",
                "pelletizing",
                "reprocessing",
                "post-consumer",
                "PCR",
                "regrind",
                "reclaim",
                "circular economy",
                "mechanical recycling",
                "chemical recycling",
                "pyrolysis",
            ],
        ),
        (
            "decorating",
            "Decorating & Finishing",
            &[
                "pad printing",
                "screen printing",
                "hot stamping",
                "IML",
                "in-mold labeling",
                "in-mold decoration",
                "IMD",
                "painting",
                "coating",
                "metalizing",
                "vacuum metalizing",
                "chrome plating",
                "laser marking",
                "engraving",
                "printing on plastic",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, keywords: &[&str]) -> Category {
        Category {
            name: name.to_string(),
            display_name: name.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    #[test]
    fn builtin_passes_validation() {
        let taxonomy = Taxonomy::builtin();
        let categories: Vec<Category> = taxonomy
            .category_names()
            .map(|name| Category {
                name: name.to_string(),
                display_name: taxonomy.display_name(name).unwrap().to_string(),
                keywords: taxonomy.keywords_for(name).unwrap().to_vec(),
            })
            .collect();
        assert!(validate_categories(&categories).is_ok());
        assert_eq!(categories.len(), 13);
    }

    #[test]
    fn classify_is_case_insensitive() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.classify("Injection Molding"), Some("injection"));
        assert_eq!(taxonomy.classify("PIPE EXTRUSION lines"), Some("extrusion"));
    }

    #[test]
    fn classify_returns_none_for_unrelated_text() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.classify("office furniture wholesale"), None);
    }

    #[test]
    fn classify_first_declared_category_wins_on_overlap() {
        // "foam injection" is a keyword of both injection and foaming;
        // injection is declared first in the builtin taxonomy.
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.classify("foam injection systems"), Some("injection"));

        // Reversed declaration order flips the result — the order is
        // configuration, not a property of the matcher.
        let reversed = Taxonomy::from_categories(vec![
            category("foaming", &["foam injection"]),
            category("injection", &["foam injection", "injection"]),
        ])
        .unwrap();
        assert_eq!(reversed.classify("foam injection systems"), Some("foaming"));
    }

    #[test]
    fn keywords_for_unknown_category_is_none() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.keywords_for("casting").is_none());
    }

    #[test]
    fn keywords_are_lowercased_at_construction() {
        let taxonomy = Taxonomy::from_categories(vec![category("x", &["BOPP", "Blown Film"])])
            .unwrap();
        assert_eq!(
            taxonomy.keywords_for("x").unwrap(),
            &["bopp".to_string(), "blown film".to_string()]
        );
    }

    #[test]
    fn text_matches_substring_case_insensitive() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.text_matches("injection", "Gas-Assisted Injection lines"));
        assert!(!taxonomy.text_matches("injection", "rotational casting"));
        assert!(!taxonomy.text_matches("no_such_category", "injection"));
    }

    #[test]
    fn display_name_for_builtin_category() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(
            taxonomy.display_name("blow_molding"),
            Some("Blow Molding (PET, HDPE, all types)")
        );
    }

    #[test]
    fn validation_rejects_duplicate_category() {
        let result = Taxonomy::from_categories(vec![
            category("injection", &["injection"]),
            category("Injection", &["imm"]),
        ]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validation_rejects_empty_keywords() {
        let result = Taxonomy::from_categories(vec![category("injection", &[])]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validation_rejects_blank_name() {
        let result = Taxonomy::from_categories(vec![category("  ", &["x"])]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
