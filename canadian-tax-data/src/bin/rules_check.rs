use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use canadian_tax_core::TaxRules;
use canadian_tax_data::{RulesLoader, SHIPPED_DATA_DIR};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Validate a directory of tax rule files.
///
/// The directory should contain:
/// - brackets.csv: tax_year,jurisdiction,upper_limit,rate
/// - one <year>.toml per tax year with the basic personal amounts and
///   every per-year parameter
#[derive(Parser, Debug)]
#[command(name = "tax-rules-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing brackets.csv and <year>.toml files
    #[arg(short, long, default_value = SHIPPED_DATA_DIR)]
    dir: PathBuf,

    /// Fail if a year also built into the engine differs from the files
    #[arg(short, long, default_value_t = false)]
    compare_builtin: bool,
}

/// Level: INFO by default, or overridden by the RUST_LOG env var.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_ansi(io::stdout().is_terminal())
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let rules = RulesLoader::load_dir(&args.dir)
        .with_context(|| format!("Failed to load rules from: {}", args.dir.display()))?;

    for tax_year in rules.available_years() {
        let year = rules.year(tax_year)?;
        let provinces: Vec<String> = year.table().provinces().map(|p| p.to_string()).collect();
        info!(
            tax_year,
            federal_brackets = year.table().federal().len(),
            provinces = %provinces.join(","),
            "rules valid"
        );
    }

    if args.compare_builtin {
        let builtin = TaxRules::canada().context("failed to build built-in rules")?;
        let mut mismatched = Vec::new();

        for tax_year in builtin.available_years() {
            match (rules.year(tax_year), builtin.year(tax_year)) {
                (Ok(loaded), Ok(expected)) if loaded != expected => mismatched.push(tax_year),
                (Ok(_), Ok(_)) => info!(tax_year, "matches built-in rules"),
                _ => warn!(tax_year, "built-in year has no rule files"),
            }
        }

        if !mismatched.is_empty() {
            bail!("rule files differ from built-in rules for {mismatched:?}");
        }
    }

    Ok(())
}
