// Credly Tracker - Core Library
// Badge classification and points accounting, exposed to the CLI, API server and tests

pub mod tier;
pub mod points;
pub mod classifier;
pub mod error;
pub mod db;
pub mod cards;
pub mod html;
pub mod ledger;
pub mod report;
pub mod tools;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use tier::{BadgeStatus, Tier};
pub use points::{points_for, points_table, rule_label, total_points, PointsRule};
pub use classifier::{
    classify, classify_detailed, default_mappings, CertificationMapping, ClassificationResult,
    Classifier, MatchSource,
};
pub use error::{LedgerError, LedgerResult};
pub use db::{Badge, BadgeStore};
pub use cards::{load_cards, CardDetails, CardFormat, CardSource, ScrapedCard};
pub use html::{extract_profile_cards, parse_badge_page, BadgeDetails};
pub use ledger::{
    CategoryBreakdown, Certifications, ImportSummary, Ledger, Preview, Score, TierSummary,
};
pub use tools::{call_tool, tool_definitions, ToolDefinition};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
