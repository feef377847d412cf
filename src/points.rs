// ⭐ Points Calculator
// Fixed tier → points ruleset and valid-badge totals

use crate::db::Badge;
use crate::tier::Tier;
use serde::Serialize;

/// Points awarded for Professional and Specialty certifications.
pub const PROFESSIONAL_POINTS: f64 = 10.0;
pub const ASSOCIATE_POINTS: f64 = 5.0;
pub const FOUNDATIONAL_POINTS: f64 = 10.0;
/// Catch-all value for anything the classifier could not place.
pub const OTHER_POINTS: f64 = 2.5;

/// One row of the published points table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsRule {
    pub label: &'static str,
    pub points: f64,
}

/// Point value of a tier. Rules are checked in priority order.
pub fn points_for(tier: Tier) -> f64 {
    match tier {
        Tier::Professional | Tier::Specialty => PROFESSIONAL_POINTS,
        Tier::Associate => ASSOCIATE_POINTS,
        Tier::Foundational => FOUNDATIONAL_POINTS,
        _ => OTHER_POINTS,
    }
}

/// Label of the points-table row a tier falls under.
pub fn rule_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Professional | Tier::Specialty => "Any Professional or Specialty",
        Tier::Associate => "Any associate or Hashicorp",
        Tier::Foundational => "Any Foundational",
        _ => "Anything else",
    }
}

pub fn points_table() -> Vec<PointsRule> {
    [Tier::Professional, Tier::Associate, Tier::Foundational, Tier::Unknown]
        .into_iter()
        .map(|tier| PointsRule {
            label: rule_label(tier),
            points: points_for(tier),
        })
        .collect()
}

/// Sum of points over Valid badges. Expired badges are skipped entirely.
pub fn total_points(badges: &[Badge]) -> f64 {
    badges
        .iter()
        .filter(|badge| badge.status.is_valid())
        .map(|badge| badge.points)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::BadgeStatus;

    fn badge(name: &str, points: f64, status: BadgeStatus) -> Badge {
        Badge::new(name, Tier::Unknown, "N/A", "N/A", status, points)
    }

    #[test]
    fn test_points_rule_table() {
        assert_eq!(points_for(Tier::Foundational), 10.0);
        assert_eq!(points_for(Tier::Associate), 5.0);
        assert_eq!(points_for(Tier::Professional), 10.0);
        assert_eq!(points_for(Tier::Specialty), 10.0);
        assert_eq!(points_for(Tier::Unknown), 2.5);

        // Deterministic across calls
        for tier in Tier::ALL {
            assert_eq!(points_for(tier), points_for(tier));
        }
    }

    #[test]
    fn test_rule_labels() {
        assert_eq!(rule_label(Tier::Specialty), "Any Professional or Specialty");
        assert_eq!(rule_label(Tier::Unknown), "Anything else");

        let table = points_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table[1].label, "Any associate or Hashicorp");
        assert_eq!(table[3].points, 2.5);
    }

    #[test]
    fn test_total_skips_expired() {
        let badges = vec![
            badge("Valid Ten", 10.0, BadgeStatus::Valid),
            badge("Expired Ten", 10.0, BadgeStatus::Expired),
            badge("Valid Other", 2.5, BadgeStatus::Valid),
        ];

        assert_eq!(total_points(&badges), 12.5);
        assert_eq!(total_points(&[]), 0.0);
        assert_eq!(total_points(&badges[1..2]), 0.0);
    }
}
