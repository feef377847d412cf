// Plain-text rendering of ledger results for the CLI and tool output

use crate::html::BadgeDetails;
use crate::ledger::{CategoryBreakdown, Certifications, ImportSummary, Preview, Score};
use crate::points::{points_for, points_table};
use crate::tier::Tier;
use std::fmt::Write;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn table_header(out: &mut String) {
    out.push_str("| Cert | Point |\n");
    out.push_str("|------|-------|\n");
}

pub fn points_table_text() -> String {
    let mut out = String::from("CERTIFICATION POINTS TABLE\n\n");
    table_header(&mut out);
    for rule in points_table() {
        let _ = writeln!(out, "| {} | {} |", rule.label, rule.points);
    }
    out
}

pub fn score_text(score: &Score) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Certification: {}", score.name);
    let _ = writeln!(out, "Category: {}\n", score.tier);
    table_header(&mut out);
    let _ = writeln!(out, "| {} | {} |", score.rule, score.points);
    out
}

pub fn preview_text(preview: &Preview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Certification: {}", preview.name);
    let _ = writeln!(out, "Category: {}", preview.tier);
    let _ = writeln!(out, "  • Current Points: {}", preview.current_total);
    let _ = writeln!(out, "  • After Earning: {}", preview.projected_total);
    let _ = writeln!(out, "  • Increase: +{}", preview.points);
    out
}

pub fn total_text(total: f64, breakdown: &CategoryBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TOTAL POINTS: {}\n", total);
    out.push_str("Breakdown by Category:\n");

    let mut rows: Vec<(Tier, f64)> = breakdown
        .tiers
        .iter()
        .filter(|(_, s)| s.valid_points > 0.0)
        .map(|(tier, s)| (*tier, s.valid_points))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (tier, points) in rows {
        let _ = writeln!(out, "  • {}: {} points", tier, points);
    }
    out
}

pub fn breakdown_text(breakdown: &CategoryBreakdown) -> String {
    let mut out = format!("{:<14} {:>7} {:>13}\n", "Tier", "Badges", "Valid Points");
    for (tier, summary) in &breakdown.tiers {
        let _ = writeln!(
            out,
            "{:<14} {:>7} {:>13}",
            tier.as_str(),
            summary.badge_count,
            summary.valid_points
        );
    }
    out
}

pub fn certifications_text(certs: &Certifications) -> String {
    if certs.badges.is_empty() {
        return "No certifications found in database. Import a profile first.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "YOUR CERTIFICATIONS ({} total)", certs.badges.len());
    let _ = writeln!(
        out,
        "✓ Valid: {} | ✗ Expired: {} | Total Points: {}\n",
        certs.valid_count, certs.expired_count, certs.total_points
    );

    for (i, badge) in certs.badges.iter().enumerate() {
        let icon = if badge.is_valid() { "✓" } else { "✗" };
        let _ = writeln!(out, "{}. {} {}", i + 1, icon, badge.name);
        let _ = writeln!(out, "   Category: {} | Points: {}", badge.tier, badge.points);
        let _ = writeln!(
            out,
            "   Issued: {} | Expires: {}\n",
            badge.issue_date, badge.expiry_date
        );
    }
    out
}

pub fn import_text(summary: &ImportSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "✓ Inserted: {} badges", summary.inserted);
    let _ = writeln!(out, "✓ Skipped duplicates: {}", summary.duplicates);
    if summary.skipped > 0 {
        let _ = writeln!(out, "✗ Skipped unnamed cards: {}", summary.skipped);
    }
    if !summary.inserted_by_tier.is_empty() {
        out.push_str("\nBreakdown by Category:\n");
        for (tier, count) in &summary.inserted_by_tier {
            let _ = writeln!(
                out,
                "  • {}: {} badges ({} points)",
                tier,
                count,
                *count as f64 * points_for(*tier)
            );
        }
    }
    out
}

pub fn badge_details_text(details: &BadgeDetails, score: &Score) -> String {
    let mut out = String::from("CREDLY BADGE DETAILS\n");
    let _ = writeln!(out, "{}\n", RULE);
    let _ = writeln!(out, "Badge Name: {}", details.badge_name);
    let _ = writeln!(out, "Certificate Holder: {}", details.certificate_holder);
    let _ = writeln!(out, "Dates: {}", details.dates);
    let _ = writeln!(out, "Category: {}\n", score.tier);
    table_header(&mut out);
    let _ = writeln!(out, "| {} | {} |", score.rule, score.points);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::BadgeStore;
    use crate::ledger::Ledger;

    #[test]
    fn test_points_table_text() {
        let text = points_table_text();
        assert!(text.contains("| Any Professional or Specialty | 10 |"));
        assert!(text.contains("| Any associate or Hashicorp | 5 |"));
        assert!(text.contains("| Anything else | 2.5 |"));
    }

    #[test]
    fn test_total_text_orders_by_points() {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);
        ledger.record_badge("Terraform Associate", "Issued\n2023").unwrap();
        ledger.record_badge("AWS Certified Security Specialty", "Issued\n2023").unwrap();
        ledger.record_badge("AWS Certified Database Specialty", "Issued\n2023").unwrap();

        let text = total_text(
            ledger.total_points().unwrap(),
            &ledger.category_breakdown().unwrap(),
        );
        assert!(text.starts_with("TOTAL POINTS: 25"));
        let specialty = text.find("Specialty: 20 points").unwrap();
        let associate = text.find("Associate: 5 points").unwrap();
        assert!(specialty < associate);
        assert!(!text.contains("Unknown"));
    }

    #[test]
    fn test_empty_certifications() {
        let store = BadgeStore::open_in_memory().unwrap();
        let certs = Ledger::new(&store).certifications().unwrap();
        assert!(certifications_text(&certs).starts_with("No certifications found"));
    }
}
