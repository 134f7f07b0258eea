//! IRRBB CLI
//!
//! Values one portfolio of contracts under the regulatory rate scenarios and
//! prints (optionally saves) the EVE / NII result.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use irrbb_engine::curve::load_curve_points;
use irrbb_engine::portfolio::{
    CsvContractRepository, InMemoryResultStore, JsonResultStore, PortfolioValuation, ResultStore,
};
use irrbb_engine::{EngineConfig, IrrbbEngine, Scenario};
use std::path::{Path, PathBuf};

/// Interest rate risk in the banking book: EVE and NII under shocked curves
#[derive(Parser)]
#[command(name = "irrbb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON engine configuration (shocks, horizon, grouping, curve)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contract CSV file, or a directory of `<portfolio>.csv` files
    #[arg(long)]
    contracts: PathBuf,

    /// Portfolio id (defaults to the contract file stem)
    #[arg(short, long)]
    portfolio: Option<String>,

    /// Reference curve CSV with `Tenor,Rate` columns
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(short = 'd', long)]
    valuation_date: Option<NaiveDate>,

    /// NII horizon in years
    #[arg(long)]
    horizon: Option<f64>,

    /// Aggregate by (product, side)
    #[arg(short, long)]
    grouped: bool,

    /// Directory for persisted JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn resolve_portfolio(contracts: &Path, portfolio: Option<String>) -> Result<(PathBuf, String)> {
    if contracts.is_dir() {
        let id = portfolio.context("--portfolio is required when --contracts is a directory")?;
        return Ok((contracts.to_path_buf(), id));
    }

    let stem = contracts
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid contract file name: {}", contracts.display()))?
        .to_string();
    if let Some(id) = portfolio {
        if id != stem {
            bail!("--portfolio {} does not match contract file {}", id, contracts.display());
        }
    }
    let root = contracts
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((root, stem))
}

fn print_groups(valuation: &PortfolioValuation) {
    println!("\nBy group:");
    println!(
        "{:<32} {:>6} {:>18} {:>18} {:>18} {:>16}",
        "Group", "Count", "Notional", "EVE base", "EVE worst", "NII base"
    );
    println!("{}", "-".repeat(113));
    for group in &valuation.groups {
        let worst = group.eve.worst().map(|(_, v)| v).unwrap_or(0.0);
        println!(
            "{:<32} {:>6} {:>18.2} {:>18.2} {:>18.2} {:>16.2}",
            group.key.to_string(),
            group.contracts,
            group.notional,
            group.eve.get(Scenario::Base),
            worst,
            group.nii.get(Scenario::Base),
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.curve {
        let points = load_curve_points(path)
            .with_context(|| format!("Failed to load curve {}", path.display()))?;
        config.curve = Some(points);
    }
    if let Some(horizon) = cli.horizon {
        config.nii_horizon_years = horizon;
    }
    if cli.grouped {
        config.grouped = true;
    }

    let valuation_date = cli.valuation_date.unwrap_or_else(|| Local::now().date_naive());
    let (root, portfolio_id) = resolve_portfolio(&cli.contracts, cli.portfolio.clone())?;

    let engine = IrrbbEngine::new(config).context("Failed to build curve family")?;
    let repository = CsvContractRepository::new(root);
    let store: Box<dyn ResultStore> = match &cli.output_dir {
        Some(dir) => Box::new(JsonResultStore::new(dir)),
        None => Box::new(InMemoryResultStore::new()),
    };

    let outcome = engine
        .run(&repository, store.as_ref(), &portfolio_id, valuation_date)
        .with_context(|| format!("Failed to value portfolio {}", portfolio_id))?;

    let Some(outcome) = outcome else {
        println!("Portfolio {} produced no result (no contracts or no cashflows)", portfolio_id);
        return Ok(());
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else {
        outcome.result.print_summary();
        if engine.grouping().is_grouped() {
            print_groups(&outcome.valuation);
        }
        for skipped in &outcome.result.metadata.skipped {
            println!("  skipped {}: {}", skipped.contract_id, skipped.reason);
        }
    }

    if cli.output_dir.is_some() {
        println!("\nSaved result {}", outcome.id);
    }

    Ok(())
}
