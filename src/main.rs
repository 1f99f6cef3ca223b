use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use property_book::config::{Config, OutputFormat};
use property_book::logging::init_logging;
use property_book::{
    detect_kind, open_workbook, save_book_csv, ComponentHandReceipt, ComponentReceiptParser,
    ConsistencyWarning, EndItemGroup, ReceiptHeader, ReceiptParser, ReconciliationEngine,
    ReconciliationReport, UnitHandReceipt, UnitReceiptParser, Workbook,
};

#[derive(Parser, Debug)]
#[command(
    name = "property-book",
    version,
    about = "Parse hand receipts and reconcile them into a property book"
)]
struct Cli {
    /// Output format (overrides the config file)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Log filter, e.g. "info" or "property_book=debug" (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a Unit Level Hand Receipt
    Unit { file: PathBuf },
    /// Parse a Component Hand Receipt
    Component { file: PathBuf },
    /// Reconcile a component receipt against a unit receipt
    Reconcile {
        #[arg(long)]
        unit: PathBuf,
        #[arg(long)]
        component: PathBuf,
        /// Also write the property book as CSV, one row per end item
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Report which kind of hand receipt a file is
    Detect { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging).context("Failed to initialize logging")?;
    let format = cli.format.unwrap_or(config.output);

    match cli.command {
        Command::Unit { file } => run_unit(&file, format),
        Command::Component { file } => run_component(&file, format),
        Command::Reconcile {
            unit,
            component,
            csv,
        } => run_reconcile(&unit, &component, csv.as_deref(), format),
        Command::Detect { file } => run_detect(&file),
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

fn load(path: &Path) -> Result<Workbook> {
    open_workbook(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn parse_unit(path: &Path) -> Result<UnitHandReceipt> {
    let workbook = load(path)?;
    UnitReceiptParser::new()
        .parse(&workbook)
        .with_context(|| format!("Failed to parse unit hand receipt {}", path.display()))
}

fn parse_component(path: &Path) -> Result<ComponentHandReceipt> {
    let workbook = load(path)?;
    ComponentReceiptParser::new()
        .parse(&workbook)
        .with_context(|| format!("Failed to parse component hand receipt {}", path.display()))
}

fn run_unit(path: &Path, format: OutputFormat) -> Result<()> {
    let receipt = parse_unit(path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Text => {
            println!("📋 Unit Level Hand Receipt: {}", path.display());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            print_header(&receipt.header);
            println!("Team:          {}", receipt.team);
            println!("Date prepared: {}", receipt.date_prepared);
            print_groups(&receipt.groups);
            print_warnings(&receipt.warnings);
        }
    }
    Ok(())
}

fn run_component(path: &Path, format: OutputFormat) -> Result<()> {
    let receipt = parse_component(path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Text => {
            println!("🧩 Component Hand Receipt: {}", path.display());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            print_header(&receipt.header);
            print_groups(&receipt.groups);
            print_warnings(&receipt.warnings);
        }
    }
    Ok(())
}

fn run_reconcile(unit_path: &Path, component_path: &Path, csv: Option<&Path>, format: OutputFormat) -> Result<()> {
    let unit_workbook = load(unit_path)?;
    let component_workbook = load(component_path)?;

    let unit = UnitReceiptParser::new()
        .parse(&unit_workbook)
        .with_context(|| format!("Failed to parse unit hand receipt {}", unit_path.display()))?;
    let component = ComponentReceiptParser::new()
        .parse(&component_workbook)
        .with_context(|| format!("Failed to parse component hand receipt {}", component_path.display()))?;

    let report = ReconciliationEngine::new()
        .reconcile(&component, &unit)
        .with_sources(component_workbook.fingerprint(), unit_workbook.fingerprint());

    if let Some(csv_path) = csv {
        save_book_csv(&report.book, csv_path)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report, csv),
    }
    Ok(())
}

fn run_detect(path: &Path) -> Result<()> {
    let workbook = load(path)?;
    match detect_kind(&workbook) {
        Ok(kind) => {
            println!("{}: {} ({} sheets)", path.display(), kind.name(), workbook.sheet_count());
            Ok(())
        }
        Err(err) => bail!("{}: {}", path.display(), err),
    }
}

// ============================================================================
// TEXT OUTPUT
// ============================================================================

fn print_header(header: &ReceiptHeader) {
    println!("UIC/DESC:      {} / {}", header.uic, header.desc);
    println!("From:          {}", header.from);
    println!("To:            {}", header.to);
}

fn print_groups(groups: &[EndItemGroup]) {
    println!("\n📦 {} end item groups", groups.len());
    for group in groups {
        let quantity = group
            .quantity()
            .map(|q| q.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<6} {:<13} {:<40} qty {:>4}  items {:>4}{}",
            group.lin(),
            group.nsn(),
            group.name(),
            quantity,
            group.len(),
            if group.serialized() { "  (serialized)" } else { "" }
        );
    }
}

fn print_warnings(warnings: &[ConsistencyWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n⚠️  {} warnings", warnings.len());
    for warning in warnings {
        println!("  {}", warning);
    }
}

fn print_report(report: &ReconciliationReport, csv: Option<&Path>) {
    let book = &report.book;

    println!("📒 Property Book");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Run:           {}", report.run_id);
    println!("UIC/DESC:      {} / {}", book.uic, book.desc);
    println!("Team:          {}", book.team);
    println!("Date prepared: {}", book.date_prepared);
    println!("Signee:        {}", book.signee);
    println!("Signer:        {}", book.signer);
    print_groups(&book.groups);

    if report.has_dropped_groups() {
        println!("\n🗑️  Dropped component groups:");
        for key in &report.dropped {
            println!("  {}", key);
        }
    }
    print_warnings(&report.warnings);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", report.summary());
    if let Some(path) = csv {
        println!("✓ Wrote {}", path.display());
    }
}
