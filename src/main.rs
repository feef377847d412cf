// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credly_tracker::cards::{detect_format, get_source};
use credly_tracker::config::{init_logging, LogFormat, DEFAULT_DB_FILE};
use credly_tracker::{
    call_tool, parse_badge_page, report, tool_definitions, BadgeStore,
    CertificationMapping, Ledger, ScrapedCard, Tier,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "credly-tracker", version, about = "Credly badge points tracker")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "CREDLY_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import scraped badge cards from a .csv, .json or saved profile .html file
    Import {
        file: PathBuf,
    },
    /// Record a single badge card
    Record {
        name: String,
        /// Card text (dates, "Expired" marker)
        #[arg(long, default_value = "")]
        text: String,
    },
    /// List stored certifications
    List,
    /// Total points of valid certifications
    Total,
    /// Badge count and valid points per tier
    Breakdown,
    /// Classify a certification name and show its points
    Classify {
        name: String,
    },
    /// Points a certification would add to the current total
    Preview {
        name: String,
    },
    /// Show the points table
    Table,
    /// Show details and points of a saved single-badge page
    Inspect {
        file: PathBuf,
    },
    /// Manage keyword → tier mappings
    Mappings {
        #[command(subcommand)]
        action: MappingAction,
    },
    /// Agent tool definitions and dispatch
    Tools {
        #[command(subcommand)]
        action: ToolAction,
    },
    /// Interactive terminal UI
    #[cfg(feature = "tui")]
    Tui,
}

#[derive(Subcommand)]
enum MappingAction {
    /// List mappings in match order
    List,
    /// Append a mapping
    Add {
        keyword: String,
        /// Foundational, Associate, Professional or Specialty
        tier: String,
    },
}

#[derive(Subcommand)]
enum ToolAction {
    /// Print tool definitions as JSON
    List,
    /// Call a tool with JSON arguments
    Call {
        name: String,
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_logging(LogFormat::from_env());

    let cli = Cli::parse();

    let store = BadgeStore::open(&cli.db)
        .with_context(|| format!("Failed to open database {}", cli.db.display()))?;
    let ledger = Ledger::new(&store);

    match cli.command {
        Commands::Import { file } => run_import(&ledger, &file),
        Commands::Record { name, text } => {
            let inserted = ledger.record_badge(&name, &text)?;
            let shown = ScrapedCard::new(&name, &text).resolved_name().unwrap_or_default();
            if inserted {
                println!("✓ Recorded: {}", shown);
            } else {
                println!("✓ Already recorded: {}", shown);
            }
            Ok(())
        }
        Commands::List => {
            print!("{}", report::certifications_text(&ledger.certifications()?));
            Ok(())
        }
        Commands::Total => {
            let total = ledger.total_points()?;
            print!("{}", report::total_text(total, &ledger.category_breakdown()?));
            Ok(())
        }
        Commands::Breakdown => {
            print!("{}", report::breakdown_text(&ledger.category_breakdown()?));
            Ok(())
        }
        Commands::Classify { name } => {
            print!("{}", report::score_text(&ledger.classify_and_score(&name)?));
            Ok(())
        }
        Commands::Preview { name } => {
            print!("{}", report::preview_text(&ledger.preview_certification(&name)?));
            Ok(())
        }
        Commands::Table => {
            print!("{}", report::points_table_text());
            Ok(())
        }
        Commands::Inspect { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let details = parse_badge_page(&html)?;
            let score = ledger.classify_and_score(&details.badge_name)?;
            print!("{}", report::badge_details_text(&details, &score));
            Ok(())
        }
        Commands::Mappings { action } => run_mappings(&store, action),
        Commands::Tools { action } => run_tools(&ledger, action),
        #[cfg(feature = "tui")]
        Commands::Tui => run_ui_mode(&ledger),
    }
}

fn run_import(ledger: &Ledger<'_>, file: &Path) -> Result<()> {
    let source = get_source(detect_format(file)?);
    println!("📂 Loading {} cards from {}...", source.format().name(), file.display());
    let cards = source.load(file)?;
    println!("✓ Loaded {} cards", cards.len());

    let summary = ledger.import_cards(&cards)?;
    print!("{}", report::import_text(&summary));
    Ok(())
}

fn run_mappings(store: &BadgeStore, action: MappingAction) -> Result<()> {
    match action {
        MappingAction::List => {
            for (i, mapping) in store.mappings()?.iter().enumerate() {
                println!("{:>3}. {:<48} {}", i + 1, mapping.keyword, mapping.tier);
            }
        }
        MappingAction::Add { keyword, tier } => {
            let tier = Tier::parse(&tier)
                .ok_or_else(|| anyhow::anyhow!("Unknown tier: {}", tier))?;
            let mapping = CertificationMapping::new(&keyword, tier);
            if store.add_mapping(&mapping)? {
                println!("✓ Added mapping: {} → {}", mapping.keyword, mapping.tier);
            } else {
                println!("✓ Mapping already exists: {}", mapping.keyword);
            }
        }
    }
    Ok(())
}

fn run_tools(ledger: &Ledger<'_>, action: ToolAction) -> Result<()> {
    match action {
        ToolAction::List => {
            println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
        }
        ToolAction::Call { name, args } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("Tool arguments must be a JSON object")?;
            let result = call_tool(ledger, &name, &args)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(ledger: &Ledger<'_>) -> Result<()> {
    let certifications = ledger.certifications()?;
    let breakdown = ledger.category_breakdown()?;

    let mut app = ui::App::new(certifications, breakdown);
    ui::run_ui(&mut app)?;

    println!("\n✓ UI closed");
    Ok(())
}
