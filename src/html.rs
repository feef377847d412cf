// 🌐 Saved-page extraction
// Pulls badge cards out of a saved Credly profile page and badge details out
// of a saved single-badge page. Fetching and rendering pages is left to the
// caller; this only reads HTML that is already on disk.

use crate::cards::{CardFormat, CardSource, ScrapedCard};
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::path::Path;

/// Card selectors in priority order; the first one that finds anything wins.
pub const CARD_SELECTORS: &[&str] = &[
    "[data-test-id='badge-card']",
    "div.cr-standard-grid__item",
    "div[class*='BadgeCard']",
    "div[class*='badge']",
    "a[href*='/badges/']",
];

/// Tags searched, in order, for a card's badge name.
const NAME_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "span"];

const BADGE_NAME_SELECTOR: &str = "div.cr-badges-full-badge__head-group";
const HOLDER_SELECTOR: &str = "p.badge-banner-issued-to-text__name-and-celebrator-list";
const EXPIRES_SELECTOR: &str = "span.cr-badge-banner-expires-at-text";

const NOT_AVAILABLE: &str = "N/A";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {}: {:?}", css, e))
}

/// Rendered-ish text of an element: trimmed text nodes, one per line.
fn element_lines(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_inline(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn card_name(card: &ElementRef<'_>) -> Result<Option<String>> {
    for tag in NAME_TAGS {
        let tag_sel = selector(tag)?;
        for element in card.select(&tag_sel) {
            let text = element_inline(&element);
            let len = text.chars().count();
            if len > 10 && len < 200 {
                return Ok(Some(text));
            }
        }
    }

    Ok(None)
}

/// Extract cards from a profile page. Cards without text or without a
/// usable name are skipped.
pub fn extract_profile_cards(html: &str) -> Result<Vec<ScrapedCard>> {
    let document = Html::parse_document(html);

    for css in CARD_SELECTORS {
        let card_sel = selector(css)?;
        let elements: Vec<ElementRef<'_>> = document.select(&card_sel).collect();
        if elements.is_empty() {
            continue;
        }

        let mut cards = Vec::new();
        for element in elements {
            let raw_text = element_lines(&element);
            if raw_text.is_empty() {
                continue;
            }
            if let Some(name) = card_name(&element)? {
                cards.push(ScrapedCard { name, raw_text });
            }
        }
        return Ok(cards);
    }

    Ok(Vec::new())
}

/// Saved profile page as a card source.
pub struct HtmlProfileSource;

impl CardSource for HtmlProfileSource {
    fn load(&self, path: &Path) -> Result<Vec<ScrapedCard>> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read HTML file: {}", path.display()))?;
        extract_profile_cards(&html)
    }

    fn format(&self) -> CardFormat {
        CardFormat::Html
    }
}

// ============================================================================
// SINGLE BADGE PAGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeDetails {
    pub badge_name: String,
    pub certificate_holder: String,
    /// Issue/expiry sentence of the banner, e.g. "Issued on ... Expires on ..."
    pub dates: String,
}

pub fn parse_badge_page(html: &str) -> Result<BadgeDetails> {
    let document = Html::parse_document(html);

    let first_text = |css: &str| -> Result<String> {
        let sel = selector(css)?;
        Ok(document
            .select(&sel)
            .next()
            .map(|e| element_lines(&e))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
    };

    let badge_name = first_text(BADGE_NAME_SELECTOR)?;
    let certificate_holder = first_text(HOLDER_SELECTOR)?;

    // The dates live in the <p> enclosing the "expires at" span
    let expires_sel = selector(EXPIRES_SELECTOR)?;
    let dates = document
        .select(&expires_sel)
        .next()
        .and_then(|span| {
            span.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "p")
        })
        .map(|p| element_inline(&p))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(BadgeDetails {
        badge_name,
        certificate_holder,
        dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::BadgeStatus;

    const PROFILE: &str = r#"
        <html><body>
          <div data-test-id="badge-card">
            <div class="badge-title"><span>AWS Certified Cloud Practitioner</span></div>
            <p>Amazon Web Services</p>
            <p>Issued</p><p>Jan 12, 2023</p>
            <p>Expires</p><p>Jan 12, 2026</p>
          </div>
          <div data-test-id="badge-card">
            <h3>HashiCorp Certified: Terraform Associate</h3>
            <p>Issued</p><p>Feb 01, 2021</p>
            <p>Expired</p>
          </div>
          <div data-test-id="badge-card">
            <span>Short</span>
          </div>
          <div data-test-id="badge-card"></div>
        </body></html>
    "#;

    #[test]
    fn test_extract_profile_cards() {
        let cards = extract_profile_cards(PROFILE).unwrap();
        assert_eq!(cards.len(), 2);

        assert_eq!(cards[0].name, "AWS Certified Cloud Practitioner");
        let details = cards[0].details();
        assert_eq!(details.issue_date, "Jan 12, 2023");
        assert_eq!(details.expiry_date, "Jan 12, 2026");
        assert_eq!(details.status, BadgeStatus::Valid);

        assert_eq!(cards[1].name, "HashiCorp Certified: Terraform Associate");
        assert_eq!(cards[1].details().status, BadgeStatus::Expired);
    }

    #[test]
    fn test_selector_priority_fallback() {
        let html = r#"<div class="cr-standard-grid__item"><h2>Google Cloud Digital Leader</h2><p>Issued</p><p>2024</p></div>"#;
        let cards = extract_profile_cards(html).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Google Cloud Digital Leader");

        assert!(extract_profile_cards("<html><p>nothing here</p></html>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_badge_page() {
        let html = r#"
            <div class="cr-badges-full-badge__head-group">AWS Certified Security – Specialty</div>
            <p class="badge-banner-issued-to-text__name-and-celebrator-list">Jane Doe</p>
            <p>Issued on Apr 2, 2024
              <span class="cr-badge-banner-expires-at-text">Expires on Apr 2, 2027</span>
            </p>
        "#;

        let details = parse_badge_page(html).unwrap();
        assert_eq!(details.badge_name, "AWS Certified Security – Specialty");
        assert_eq!(details.certificate_holder, "Jane Doe");
        assert_eq!(details.dates, "Issued on Apr 2, 2024 Expires on Apr 2, 2027");
    }

    #[test]
    fn test_parse_badge_page_missing_fields() {
        let details = parse_badge_page("<html><body></body></html>").unwrap();
        assert_eq!(details.badge_name, "N/A");
        assert_eq!(details.certificate_holder, "N/A");
        assert_eq!(details.dates, "N/A");
    }
}
