// 🎓 Certification Tiers
// Tier enumeration and the fixed points rule table

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TIER
// ============================================================================

/// Certification level a badge is classified into.
///
/// Ordering follows declaration order, which is also the order reports use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Foundational,
    Associate,
    Professional,
    Specialty,
    Unknown,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Foundational,
        Tier::Associate,
        Tier::Professional,
        Tier::Specialty,
        Tier::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Foundational => "Foundational",
            Tier::Associate => "Associate",
            Tier::Professional => "Professional",
            Tier::Specialty => "Specialty",
            Tier::Unknown => "Unknown",
        }
    }

    /// Parse a stored or user-supplied label (case-insensitive).
    /// Returns `None` for anything that is not one of the five labels.
    pub fn parse(label: &str) -> Option<Tier> {
        match label.trim().to_lowercase().as_str() {
            "foundational" => Some(Tier::Foundational),
            "associate" => Some(Tier::Associate),
            "professional" => Some(Tier::Professional),
            "specialty" => Some(Tier::Specialty),
            "unknown" => Some(Tier::Unknown),
            _ => None,
        }
    }

    /// Lenient variant used when reading rows back from storage.
    pub fn from_label(label: &str) -> Tier {
        Tier::parse(label).unwrap_or(Tier::Unknown)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BADGE STATUS
// ============================================================================

/// Frozen at record time from the scraped card text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeStatus {
    Valid,
    Expired,
}

impl BadgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeStatus::Valid => "Valid",
            BadgeStatus::Expired => "Expired",
        }
    }

    pub fn from_label(label: &str) -> BadgeStatus {
        if label.eq_ignore_ascii_case("expired") {
            BadgeStatus::Expired
        } else {
            BadgeStatus::Valid
        }
    }

    /// A card is expired when its text carries the "expired" marker anywhere.
    pub fn from_card_text(raw_text: &str) -> BadgeStatus {
        if raw_text.to_lowercase().contains("expired") {
            BadgeStatus::Expired
        } else {
            BadgeStatus::Valid
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, BadgeStatus::Valid)
    }
}

impl fmt::Display for BadgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
