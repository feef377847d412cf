// 🪪 Card Extraction
// Raw scraped badge cards → name, dates and frozen status

use crate::tier::BadgeStatus;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Placeholder stored when a date line is absent from the card.
pub const MISSING_DATE: &str = "N/A";

// ============================================================================
// CORE TYPES
// ============================================================================

/// The shape a scraping collaborator hands over: a badge name plus the
/// free text of its card (dates, "Expired" marker, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedCard {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "rawText", alias = "text")]
    pub raw_text: String,
}

impl ScrapedCard {
    pub fn new(name: &str, raw_text: &str) -> Self {
        ScrapedCard {
            name: name.to_string(),
            raw_text: raw_text.to_string(),
        }
    }

    /// The explicit name, or the first non-empty line of the card text.
    pub fn resolved_name(&self) -> Option<String> {
        let name = self.name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }

        self.raw_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    pub fn details(&self) -> CardDetails {
        CardDetails::from_raw_text(&self.raw_text)
    }
}

/// Fields derived from a card's text at record time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDetails {
    pub issue_date: String,
    pub expiry_date: String,
    pub status: BadgeStatus,
}

impl CardDetails {
    pub fn from_raw_text(raw_text: &str) -> Self {
        CardDetails {
            issue_date: extract_date(raw_text, "issued"),
            expiry_date: extract_date(raw_text, "expires"),
            status: BadgeStatus::from_card_text(raw_text),
        }
    }
}

/// The trimmed line after the first line containing `keyword`
/// (case-insensitive), or [`MISSING_DATE`].
pub fn extract_date(raw_text: &str, keyword: &str) -> String {
    let lines: Vec<&str> = raw_text.lines().collect();

    lines
        .iter()
        .position(|line| line.to_lowercase().contains(keyword))
        .and_then(|i| lines.get(i + 1))
        .map(|line| line.trim().to_string())
        .filter(|date| !date.is_empty())
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

// ============================================================================
// CARD SOURCES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFormat {
    Csv,
    Json,
    /// Saved profile page
    Html,
}

impl CardFormat {
    pub fn name(&self) -> &str {
        match self {
            CardFormat::Csv => "CSV",
            CardFormat::Json => "JSON",
            CardFormat::Html => "HTML",
        }
    }
}

/// Anything that can turn a file into scraped cards.
pub trait CardSource {
    fn load(&self, path: &Path) -> Result<Vec<ScrapedCard>>;

    fn format(&self) -> CardFormat;
}

/// CSV dump with a `name,raw_text` header.
pub struct CsvCardSource;

impl CardSource for CsvCardSource {
    fn load(&self, path: &Path) -> Result<Vec<ScrapedCard>> {
        let mut rdr = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut cards = Vec::new();
        for (line_num, result) in rdr.deserialize().enumerate() {
            let card: ScrapedCard = result.with_context(|| {
                format!("Failed to parse CSV line {} in {}", line_num + 2, path.display())
            })?;
            cards.push(card);
        }

        Ok(cards)
    }

    fn format(&self) -> CardFormat {
        CardFormat::Csv
    }
}

/// JSON array of `{name, raw_text}` objects.
pub struct JsonCardSource;

impl CardSource for JsonCardSource {
    fn load(&self, path: &Path) -> Result<Vec<ScrapedCard>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;

        let cards: Vec<ScrapedCard> =
            serde_json::from_reader(file).context("Failed to parse cards JSON")?;

        Ok(cards)
    }

    fn format(&self) -> CardFormat {
        CardFormat::Json
    }
}

/// Detect the dump format from the file extension.
pub fn detect_format(path: &Path) -> Result<CardFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => Ok(CardFormat::Csv),
        "json" => Ok(CardFormat::Json),
        "html" | "htm" => Ok(CardFormat::Html),
        _ => Err(anyhow::anyhow!(
            "Could not detect card format from file name: {}",
            path.display()
        )),
    }
}

pub fn get_source(format: CardFormat) -> Box<dyn CardSource> {
    match format {
        CardFormat::Csv => Box::new(CsvCardSource),
        CardFormat::Json => Box::new(JsonCardSource),
        CardFormat::Html => Box::new(crate::html::HtmlProfileSource),
    }
}

pub fn load_cards(path: &Path) -> Result<Vec<ScrapedCard>> {
    let format = detect_format(path)?;
    get_source(format).load(path)
}
