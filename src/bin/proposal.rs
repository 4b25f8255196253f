//! CLI binary for veliz-proposals.
//!
//! A thin shim over the library crate: reads JSON or markdown files, maps
//! flags to the library's config types and prints JSON results on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use veliz_proposals::{
    build_layout, calculate, summarize_monthly, AddonCatalog, AddonCatalogEntry, AddonFrequency,
    AddonLine, BasePricing, LayoutConfig, PricingInput, PricingResult, ProposalLayout, RateTable,
};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Price a submitted wizard form with the default rate table
  proposal price form.json

  # Price with a custom rate table (missing keys fall back to defaults)
  proposal price form.json --rates rates.json

  # Price an add-on line from the catalog
  proposal addon catalog.json --sku WIN-INT --qty 2 --frequency quarterly

  # Monthly total of a base price plus add-on lines
  proposal total pricing.json lines.json

  # Split and paginate a generated proposal document
  proposal layout proposal.md --summary

ENVIRONMENT VARIABLES:
  PROPOSAL_RATES              Rate table JSON used by `price`
  PROPOSAL_FIRST_PAGE_ROWS    Scope rows on the first page (default 12)
  PROPOSAL_CONTINUATION_ROWS  Scope rows on later pages (default 14)
  PROPOSAL_VERBOSE            Enable DEBUG-level tracing logs
  PROPOSAL_QUIET              Suppress all logs except errors
  RUST_LOG                    Full tracing filter, overrides both flags
"#;

/// Price cleaning-services proposals and lay out their generated content.
#[derive(Parser, Debug)]
#[command(
    name = "proposal",
    version,
    about = "Price cleaning-services proposals and lay out their generated content",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PROPOSAL_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, global = true, env = "PROPOSAL_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the price range and hours for a wizard form (JSON).
    Price {
        /// Pricing input JSON: service_type, facility_size,
        /// service_frequency, service_specific_data.
        input: PathBuf,

        /// Rate table JSON. Defaults are used for any missing key.
        #[arg(long, env = "PROPOSAL_RATES")]
        rates: Option<PathBuf>,
    },

    /// Price one add-on line from a catalog (JSON array of entries).
    Addon {
        catalog: PathBuf,

        /// Catalog sku to price.
        #[arg(long)]
        sku: String,

        /// Quantity in the entry's unit.
        #[arg(long)]
        qty: f64,

        /// Billing frequency. Defaults to the entry's default frequency.
        #[arg(long, value_enum)]
        frequency: Option<FrequencyArg>,
    },

    /// Fold a base price and add-on lines into a monthly summary.
    Total {
        /// A `price` result, or a bare `{"low": .., "high": ..}` object.
        pricing: PathBuf,

        /// JSON array of add-on lines as printed by `addon`.
        lines: PathBuf,
    },

    /// Split, repair and paginate a generated proposal document.
    Layout {
        document: PathBuf,

        /// Scope table rows on the first page.
        #[arg(long, env = "PROPOSAL_FIRST_PAGE_ROWS")]
        first_page_rows: Option<usize>,

        /// Scope table rows on every later page.
        #[arg(long, env = "PROPOSAL_CONTINUATION_ROWS")]
        continuation_rows: Option<usize>,

        /// Print a human-readable outline instead of JSON.
        #[arg(long)]
        summary: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FrequencyArg {
    OneTime,
    Monthly,
    Quarterly,
    Annual,
}

impl From<FrequencyArg> for AddonFrequency {
    fn from(v: FrequencyArg) -> Self {
        match v {
            FrequencyArg::OneTime => AddonFrequency::OneTime,
            FrequencyArg::Monthly => AddonFrequency::Monthly,
            FrequencyArg::Quarterly => AddonFrequency::Quarterly,
            FrequencyArg::Annual => AddonFrequency::Annual,
        }
    }
}

/// What `total` accepts as its base price.
#[derive(Deserialize)]
#[serde(untagged)]
enum BaseInput {
    Result(PricingResult),
    Bounds(BasePricing),
}

impl From<BaseInput> for BasePricing {
    fn from(v: BaseInput) -> Self {
        match v {
            BaseInput::Result(result) => BasePricing::from(&result),
            BaseInput::Bounds(bounds) => bounds,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Dispatch ─────────────────────────────────────────────────────────
    match cli.command {
        Command::Price { input, rates } => {
            let input: PricingInput = read_json(&input)?;
            let rates = match rates {
                Some(path) => {
                    let table: RateTable = read_json(&path)?;
                    table
                        .validate()
                        .with_context(|| format!("Invalid rate table in {}", path.display()))?;
                    table
                }
                None => RateTable::default(),
            };
            let result = calculate(&input, &rates).context("Pricing failed")?;
            print_json(&result)
        }

        Command::Addon {
            catalog,
            sku,
            qty,
            frequency,
        } => {
            let entries: Vec<AddonCatalogEntry> = read_json(&catalog)?;
            let catalog = AddonCatalog::new(entries)
                .with_context(|| format!("Invalid add-on catalog in {}", catalog.display()))?;
            let line = catalog
                .line(&sku, qty, frequency.map(AddonFrequency::from))
                .context("Failed to price add-on")?;
            print_json(&line)
        }

        Command::Total { pricing, lines } => {
            let base: BaseInput = read_json(&pricing)?;
            let lines: Vec<AddonLine> = read_json(&lines)?;
            print_json(&summarize_monthly(&base.into(), &lines))
        }

        Command::Layout {
            document,
            first_page_rows,
            continuation_rows,
            summary,
        } => {
            let text = fs::read_to_string(&document)
                .with_context(|| format!("Failed to read {}", document.display()))?;
            let config = build_layout_config(first_page_rows, continuation_rows)?;
            let layout = build_layout(&text, &config);
            if summary {
                print_summary(&layout);
                Ok(())
            } else {
                print_json(&layout)
            }
        }
    }
}

/// Map the pagination flags onto `LayoutConfig`.
fn build_layout_config(first: Option<usize>, continuation: Option<usize>) -> Result<LayoutConfig> {
    let mut builder = LayoutConfig::builder();
    if let Some(n) = first {
        builder = builder.first_page_rows(n);
    }
    if let Some(n) = continuation {
        builder = builder.continuation_rows(n);
    }
    builder.build().context("Invalid layout configuration")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}

fn print_summary(layout: &ProposalLayout) {
    println!("Sections:");
    for section in &layout.sections {
        println!(
            "  {:<24} {}",
            section.id,
            section.title.as_deref().unwrap_or("(untitled)")
        );
    }
    let slots = [
        ("Introduction", &layout.introduction),
        ("Scope", &layout.scope),
        ("Add-ons", &layout.addons),
        ("Pricing", &layout.pricing),
        ("Notes", &layout.notes),
    ];
    println!("Slots:");
    for (name, slot) in slots {
        println!(
            "  {:<13} {}",
            name,
            slot.as_ref().map_or("-", |s| s.id.as_str())
        );
    }
    let rows: usize = layout.scope_pages.iter().map(Vec::len).sum();
    println!(
        "Scope table:  {} rows on {} pages",
        rows,
        layout.scope_page_count()
    );
    match &layout.pricing_table {
        Some(table) => println!("Pricing table: {} rows", table.rows.len()),
        None => println!("Pricing table: -"),
    }
}
