// 🏷️ Certification Classifier - Mappings as Data
// First-match keyword table with a fixed keyword fallback

use crate::tier::Tier;
use serde::{Deserialize, Serialize};

// ============================================================================
// MAPPING DEFINITION
// ============================================================================

/// Lowercase keyword/phrase → tier. Matches when the keyword occurs anywhere
/// in the lowercased badge name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationMapping {
    pub keyword: String,
    pub tier: Tier,
}

impl CertificationMapping {
    pub fn new(keyword: &str, tier: Tier) -> Self {
        CertificationMapping {
            keyword: keyword.trim().to_lowercase(),
            tier,
        }
    }

    /// `name_lower` must already be lowercased.
    pub fn matches(&self, name_lower: &str) -> bool {
        !self.keyword.is_empty() && name_lower.contains(&self.keyword)
    }
}

/// AWS mappings seeded into an empty mapping table, in insertion order.
pub const DEFAULT_MAPPINGS: &[(&str, Tier)] = &[
    ("aws certified cloud practitioner", Tier::Foundational),
    ("cloud practitioner", Tier::Foundational),
    ("aws certified solutions architect associate", Tier::Associate),
    ("solutions architect associate", Tier::Associate),
    ("aws certified developer associate", Tier::Associate),
    ("developer associate", Tier::Associate),
    ("aws certified sysops administrator associate", Tier::Associate),
    ("sysops administrator associate", Tier::Associate),
    ("sysops associate", Tier::Associate),
    ("aws certified solutions architect professional", Tier::Professional),
    ("solutions architect professional", Tier::Professional),
    ("aws certified devops engineer professional", Tier::Professional),
    ("devops engineer professional", Tier::Professional),
    ("devops professional", Tier::Professional),
    ("aws certified advanced networking specialty", Tier::Specialty),
    ("advanced networking specialty", Tier::Specialty),
    ("aws certified security specialty", Tier::Specialty),
    ("security specialty", Tier::Specialty),
    ("aws certified machine learning specialty", Tier::Specialty),
    ("machine learning specialty", Tier::Specialty),
    ("aws certified database specialty", Tier::Specialty),
    ("database specialty", Tier::Specialty),
    ("aws certified data analytics specialty", Tier::Specialty),
    ("data analytics specialty", Tier::Specialty),
    ("aws certified sap on aws specialty", Tier::Specialty),
    ("sap on aws specialty", Tier::Specialty),
];

pub fn default_mappings() -> Vec<CertificationMapping> {
    DEFAULT_MAPPINGS
        .iter()
        .map(|(keyword, tier)| CertificationMapping::new(keyword, *tier))
        .collect()
}

/// Fallback keywords, checked in this order when no mapping matches.
const FALLBACK_RULES: &[(&[&str], Tier)] = &[
    (&["practitioner", "foundational"], Tier::Foundational),
    (&["professional"], Tier::Professional),
    (&["specialty", "advanced"], Tier::Specialty),
    (&["associate"], Tier::Associate),
];

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "keyword", rename_all = "snake_case")]
pub enum MatchSource {
    /// Matched a mapping-table keyword
    Mapping(String),
    /// Matched one of the fallback words
    Keyword(String),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub tier: Tier,
    pub source: MatchSource,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        ClassificationResult {
            tier: Tier::Unknown,
            source: MatchSource::NoMatch,
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Ordered mapping table. Order is insertion order and decides ties.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    mappings: Vec<CertificationMapping>,
}

impl Classifier {
    pub fn new(mappings: Vec<CertificationMapping>) -> Self {
        Classifier { mappings }
    }

    pub fn with_defaults() -> Self {
        Classifier::new(default_mappings())
    }

    pub fn classify(&self, raw_name: &str) -> Tier {
        self.classify_detailed(raw_name).tier
    }

    pub fn classify_detailed(&self, raw_name: &str) -> ClassificationResult {
        classify_detailed(raw_name, &self.mappings)
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn mappings(&self) -> &[CertificationMapping] {
        &self.mappings
    }
}

/// Classify a free-text badge name against `mappings` in their given order.
pub fn classify(raw_name: &str, mappings: &[CertificationMapping]) -> Tier {
    classify_detailed(raw_name, mappings).tier
}

pub fn classify_detailed(raw_name: &str, mappings: &[CertificationMapping]) -> ClassificationResult {
    let name_lower = raw_name.trim().to_lowercase();
    if name_lower.is_empty() {
        return ClassificationResult::default();
    }

    if let Some(mapping) = mappings.iter().find(|m| m.matches(&name_lower)) {
        return ClassificationResult {
            tier: mapping.tier,
            source: MatchSource::Mapping(mapping.keyword.clone()),
        };
    }

    fallback(&name_lower)
}

fn fallback(name_lower: &str) -> ClassificationResult {
    for (words, tier) in FALLBACK_RULES {
        if let Some(word) = words.iter().find(|w| name_lower.contains(*w)) {
            return ClassificationResult {
                tier: *tier,
                source: MatchSource::Keyword(word.to_string()),
            };
        }
    }

    ClassificationResult::default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::points_for;

    #[test]
    fn test_mapping_match() {
        let classifier = Classifier::new(vec![CertificationMapping::new(
            "solutions architect associate",
            Tier::Associate,
        )]);

        let tier = classifier.classify("AWS Certified Solutions Architect – Associate");
        assert_eq!(tier, Tier::Associate);
        assert_eq!(points_for(tier), 5.0);

        let result = classifier.classify_detailed("aws solutions architect associate 2024");
        assert_eq!(
            result.source,
            MatchSource::Mapping("solutions architect associate".to_string())
        );
    }

    #[test]
    fn test_first_mapping_wins() {
        let mappings = vec![
            CertificationMapping::new("security", Tier::Associate),
            CertificationMapping::new("security specialty", Tier::Specialty),
        ];

        // Both keywords match; insertion order decides
        assert_eq!(classify("AWS Security Specialty", &mappings), Tier::Associate);

        let reversed: Vec<_> = mappings.into_iter().rev().collect();
        assert_eq!(classify("AWS Security Specialty", &reversed), Tier::Specialty);
    }

    #[test]
    fn test_fallback_keywords() {
        let classifier = Classifier::default();

        let advanced = classifier.classify("Some Vendor Advanced Badge");
        assert_eq!(advanced, Tier::Specialty);
        assert_eq!(points_for(advanced), 10.0);

        assert_eq!(classifier.classify("Kubernetes Practitioner"), Tier::Foundational);
        assert_eq!(classifier.classify("Foundational Data Skills"), Tier::Foundational);
        assert_eq!(classifier.classify("Terraform Associate"), Tier::Associate);

        // professional is checked before associate
        assert_eq!(
            classifier.classify("Professional Associate Hybrid"),
            Tier::Professional
        );
        // practitioner is checked before professional
        assert_eq!(
            classifier.classify("Professional Practitioner"),
            Tier::Foundational
        );
    }

    #[test]
    fn test_unknown() {
        let classifier = Classifier::with_defaults();

        let tier = classifier.classify("Totally Unrelated Badge");
        assert_eq!(tier, Tier::Unknown);
        assert_eq!(points_for(tier), 2.5);

        assert_eq!(classifier.classify(""), Tier::Unknown);
        assert_eq!(classifier.classify("   \t "), Tier::Unknown);
        assert_eq!(classifier.classify_detailed("").source, MatchSource::NoMatch);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = Classifier::with_defaults();
        for name in ["AWS Certified Cloud Practitioner", "Random Badge", "DevOps Professional"] {
            assert_eq!(classifier.classify(name), classifier.classify(name));
        }
    }

    #[test]
    fn test_default_mappings() {
        let classifier = Classifier::with_defaults();
        assert_eq!(classifier.mapping_count(), 26);
        assert_eq!(
            classifier.classify("AWS Certified SysOps Administrator Associate"),
            Tier::Associate
        );
        assert_eq!(
            classifier.classify("AWS Certified Machine Learning Specialty"),
            Tier::Specialty
        );
    }

    #[test]
    fn test_mapping_keyword_normalised() {
        let mapping = CertificationMapping::new("  HashiCorp Terraform ", Tier::Associate);
        assert_eq!(mapping.keyword, "hashicorp terraform");
        assert!(mapping.matches("hashicorp terraform associate (003)"));

        let empty = CertificationMapping::new("   ", Tier::Specialty);
        assert!(!empty.matches("anything"));
    }
}
