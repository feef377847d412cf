// 📒 Points Ledger
// Record path and read-only reporting over a borrowed BadgeStore

use crate::cards::ScrapedCard;
use crate::classifier::{ClassificationResult, Classifier};
use crate::db::{Badge, BadgeStore};
use crate::error::{LedgerError, LedgerResult};
use crate::points::{points_for, rule_label, total_points};
use crate::tier::Tier;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub name: String,
    pub tier: Tier,
    pub points: f64,
    pub rule: &'static str,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub name: String,
    pub tier: Tier,
    pub points: f64,
    pub current_total: f64,
    pub projected_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierSummary {
    /// Badges of this tier, any status
    pub badge_count: usize,
    /// Points of Valid badges of this tier
    pub valid_points: f64,
}

/// Per-tier counts and valid points. Always holds all five tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub tiers: BTreeMap<Tier, TierSummary>,
}

impl CategoryBreakdown {
    pub fn from_badges(badges: &[Badge]) -> Self {
        let mut tiers: BTreeMap<Tier, TierSummary> = Tier::ALL
            .into_iter()
            .map(|tier| (tier, TierSummary::default()))
            .collect();

        for badge in badges {
            let entry = tiers.entry(badge.tier).or_default();
            entry.badge_count += 1;
            if badge.is_valid() {
                entry.valid_points += badge.points;
            }
        }

        CategoryBreakdown { tiers }
    }

    pub fn get(&self, tier: Tier) -> TierSummary {
        self.tiers.get(&tier).cloned().unwrap_or_default()
    }

    pub fn total_valid_points(&self) -> f64 {
        self.tiers.values().map(|s| s.valid_points).sum()
    }
}

/// Listing with the counts reports show above it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certifications {
    pub badges: Vec<Badge>,
    pub valid_count: usize,
    pub expired_count: usize,
    pub total_points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    /// Cards with no usable name
    pub skipped: usize,
    /// Newly inserted badges per tier
    pub inserted_by_tier: BTreeMap<Tier, usize>,
    pub inserted_points: f64,
}

// ============================================================================
// LEDGER
// ============================================================================

pub struct Ledger<'a> {
    store: &'a BadgeStore,
}

impl<'a> Ledger<'a> {
    pub fn new(store: &'a BadgeStore) -> Self {
        Ledger { store }
    }

    fn classifier(&self) -> LedgerResult<Classifier> {
        Ok(Classifier::new(self.store.mappings()?))
    }

    fn score_with(classifier: &Classifier, name: &str) -> Score {
        let classification = classifier.classify_detailed(name);
        let tier = classification.tier;
        Score {
            name: name.trim().to_string(),
            tier,
            points: points_for(tier),
            rule: rule_label(tier),
            classification,
        }
    }

    pub fn classify_and_score(&self, name: &str) -> LedgerResult<Score> {
        Ok(Self::score_with(&self.classifier()?, name))
    }

    /// Classify, score and persist one scraped badge.
    /// Returns `false` when the `(name, issue_date)` pair is already stored.
    pub fn record_badge(&self, name: &str, raw_text: &str) -> LedgerResult<bool> {
        let classifier = self.classifier()?;
        self.record_with(&classifier, &ScrapedCard::new(name, raw_text))
            .map(|(inserted, _)| inserted)
    }

    fn record_with(&self, classifier: &Classifier, card: &ScrapedCard) -> LedgerResult<(bool, Badge)> {
        let name = card
            .resolved_name()
            .ok_or_else(|| LedgerError::invalid("badge card has no name"))?;

        let details = card.details();
        let score = Self::score_with(classifier, &name);
        let badge = Badge::new(
            &name,
            score.tier,
            &details.issue_date,
            &details.expiry_date,
            details.status,
            score.points,
        );

        let inserted = self.store.insert_if_absent(&badge)?;
        Ok((inserted, badge))
    }

    /// Record a whole scrape pass serially. Nameless cards are skipped, not fatal.
    pub fn import_cards(&self, cards: &[ScrapedCard]) -> LedgerResult<ImportSummary> {
        let classifier = self.classifier()?;
        let mut summary = ImportSummary::default();

        for card in cards {
            match self.record_with(&classifier, card) {
                Ok((true, badge)) => {
                    summary.inserted += 1;
                    *summary.inserted_by_tier.entry(badge.tier).or_insert(0) += 1;
                    summary.inserted_points += badge.points;
                }
                Ok((false, _)) => summary.duplicates += 1,
                Err(LedgerError::InvalidInput(reason)) => {
                    warn!(%reason, "skipping card");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            "import finished"
        );

        Ok(summary)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn total_points(&self) -> LedgerResult<f64> {
        Ok(total_points(&self.store.list_all()?))
    }

    pub fn category_breakdown(&self) -> LedgerResult<CategoryBreakdown> {
        Ok(CategoryBreakdown::from_badges(&self.store.list_all()?))
    }

    /// What a hypothetical certification would add. Nothing is persisted.
    pub fn preview_certification(&self, name: &str) -> LedgerResult<Preview> {
        let score = self.classify_and_score(name)?;
        let current_total = self.total_points()?;

        Ok(Preview {
            name: score.name,
            tier: score.tier,
            points: score.points,
            current_total,
            projected_total: current_total + score.points,
        })
    }

    pub fn certifications(&self) -> LedgerResult<Certifications> {
        let badges = self.store.list_all()?;
        let valid_count = badges.iter().filter(|b| b.is_valid()).count();

        Ok(Certifications {
            valid_count,
            expired_count: badges.len() - valid_count,
            total_points: total_points(&badges),
            badges,
        })
    }
}
