//! Export the cashflow schedule of every contract in a CSV file
//!
//! Writes one row per scheduled payment, in contract order, for review
//! against the EVE/NII figures.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use irrbb_engine::contract::load_contracts;
use irrbb_engine::curve::{build_curve_family, default_curve_points, load_curve_points};
use irrbb_engine::portfolio::portfolio_cashflows;
use irrbb_engine::ShockConfig;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "export_cashflows")]
#[command(about = "Write the cashflow table of a contract file to CSV")]
struct Args {
    /// Contract CSV file
    #[arg(long)]
    contracts: PathBuf,

    /// Reference curve CSV (`Tenor,Rate`); built-in curve when omitted
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(short = 'd', long)]
    valuation_date: Option<NaiveDate>,

    /// Output CSV path
    #[arg(short, long, default_value = "cashflows.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let contracts = load_contracts(&args.contracts)
        .with_context(|| format!("Failed to load contracts from {}", args.contracts.display()))?;
    println!("Loaded {} contracts in {:?}", contracts.len(), start.elapsed());

    let points = match &args.curve {
        Some(path) => load_curve_points(path)
            .with_context(|| format!("Failed to load curve {}", path.display()))?,
        None => default_curve_points(),
    };
    let family = build_curve_family(&points, &ShockConfig::default())?;
    let valuation_date = args.valuation_date.unwrap_or_else(|| Local::now().date_naive());

    let (table, skipped) = portfolio_cashflows(&contracts, &family, valuation_date);
    for s in &skipped {
        println!("  skipped {}: {}", s.contract_id, s.reason);
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Unable to create {}", args.output.display()))?;
    for row in &table {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let summary = table.summary();
    println!("\nSummary:");
    println!("  Rows: {}", summary.rows);
    println!("  Total Interest: {:.2}", summary.total_interest);
    println!("  Total Principal: {:.2}", summary.total_principal);
    println!("  Total Cashflow: {:.2}", summary.total_cashflow);
    if let Some(last) = summary.last_payment {
        println!("  Last Payment: {}", last);
    }
    println!("\nCashflows written to: {} ({:?})", args.output.display(), start.elapsed());

    Ok(())
}
