//! One aggregation routine for whole-portfolio and per-group valuation
//!
//! Contracts are scheduled independently (in parallel), concatenated per group
//! key, valued per group, and group results summed into the portfolio total.
//! Whole-portfolio mode is the same routine with a single key, so both modes
//! agree up to floating-point summation order.

use super::grouping::{GroupKey, Grouping};
use super::result::BalanceResult;
use crate::cashflow::{try_generate_cashflows, CashflowTable};
use crate::contract::Contract;
use crate::curve::{CurveFamily, Scenario};
use crate::error::Result;
use crate::valuation::{compute_eve, compute_nii, ScenarioResult, DEFAULT_NII_HORIZON_YEARS};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contract left out of a run, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedContract {
    pub contract_id: String,
    pub reason: String,
}

/// Valuation of one aggregation unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupValuation {
    pub key: GroupKey,

    /// Contracts in the group, including skipped ones
    pub contracts: usize,

    /// Contracts that produced cashflows
    pub valued_contracts: usize,

    /// Sum of notionals of all contracts in the group
    pub notional: f64,

    pub cashflow_rows: usize,

    pub eve: ScenarioResult,

    pub nii: ScenarioResult,
}

/// Portfolio valuation: per-group breakdown plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub valuation_date: NaiveDate,
    pub nii_horizon_years: f64,
    pub groups: Vec<GroupValuation>,
    pub eve: ScenarioResult,
    pub nii: ScenarioResult,
    pub contract_count: usize,
    pub valued_count: usize,
    pub cashflow_rows: usize,
    pub skipped: Vec<SkippedContract>,
}

impl PortfolioValuation {
    /// Group by key, if present
    pub fn group(&self, key: &GroupKey) -> Option<&GroupValuation> {
        self.groups.iter().find(|g| &g.key == key)
    }
}

#[derive(Default)]
struct GroupAccumulator {
    contracts: usize,
    valued_contracts: usize,
    notional: f64,
    table: CashflowTable,
}

fn schedule_all(
    contracts: &[Contract],
    family: &CurveFamily,
    valuation_date: NaiveDate,
) -> Vec<Result<CashflowTable>> {
    contracts
        .par_iter()
        .map(|contract| try_generate_cashflows(contract, family, valuation_date))
        .collect()
}

fn skip(contract: &Contract, reason: String) -> SkippedContract {
    log::warn!("skipping contract {}: {}", contract.contract_id, reason);
    SkippedContract {
        contract_id: contract.contract_id.clone(),
        reason,
    }
}

/// Concatenated cashflow table of all schedulable contracts, in input order
pub fn portfolio_cashflows(
    contracts: &[Contract],
    family: &CurveFamily,
    valuation_date: NaiveDate,
) -> (CashflowTable, Vec<SkippedContract>) {
    let mut table = CashflowTable::new();
    let mut skipped = Vec::new();

    for (contract, scheduled) in contracts.iter().zip(schedule_all(contracts, family, valuation_date)) {
        match scheduled {
            Ok(rows) => table.extend(rows),
            Err(e) => skipped.push(skip(contract, e.to_string())),
        }
    }
    (table, skipped)
}

/// Value a portfolio grouped by an arbitrary key function
///
/// A contract whose schedule cannot be generated is recorded in `skipped`
/// and still counts toward its group's contract count and notional.
pub fn aggregate_by<F>(
    contracts: &[Contract],
    family: &CurveFamily,
    valuation_date: NaiveDate,
    horizon_years: f64,
    key_fn: F,
) -> PortfolioValuation
where
    F: Fn(&Contract) -> GroupKey,
{
    let scheduled = schedule_all(contracts, family, valuation_date);

    let mut accumulators: BTreeMap<GroupKey, GroupAccumulator> = BTreeMap::new();
    let mut skipped = Vec::new();

    for (contract, result) in contracts.iter().zip(scheduled) {
        let acc = accumulators.entry(key_fn(contract)).or_default();
        acc.contracts += 1;
        acc.notional += contract.notional;

        match result {
            Ok(table) => {
                acc.valued_contracts += 1;
                acc.table.extend(table);
            }
            Err(e) => skipped.push(skip(contract, e.to_string())),
        }
    }

    let groups: Vec<GroupValuation> = accumulators
        .into_iter()
        .map(|(key, acc)| GroupValuation {
            eve: compute_eve(&acc.table, family),
            nii: compute_nii(&acc.table, family, horizon_years),
            key,
            contracts: acc.contracts,
            valued_contracts: acc.valued_contracts,
            notional: acc.notional,
            cashflow_rows: acc.table.len(),
        })
        .collect();

    let mut eve = ScenarioResult::zeros(&Scenario::ALL);
    let mut nii = ScenarioResult::zeros(&Scenario::NII);
    for group in &groups {
        eve += &group.eve;
        nii += &group.nii;
    }

    let valued_count = groups.iter().map(|g| g.valued_contracts).sum();
    let cashflow_rows = groups.iter().map(|g| g.cashflow_rows).sum();

    log::info!(
        "valued {} of {} contracts in {} group(s), {} cashflow rows, EVE base {:.2}",
        valued_count,
        contracts.len(),
        groups.len(),
        cashflow_rows,
        eve.get(Scenario::Base)
    );

    PortfolioValuation {
        valuation_date,
        nii_horizon_years: horizon_years,
        groups,
        eve,
        nii,
        contract_count: contracts.len(),
        valued_count,
        cashflow_rows,
        skipped,
    }
}

/// Value a portfolio under one of the built-in grouping modes
pub fn value_portfolio(
    contracts: &[Contract],
    family: &CurveFamily,
    valuation_date: NaiveDate,
    grouping: Grouping,
    horizon_years: f64,
) -> PortfolioValuation {
    aggregate_by(contracts, family, valuation_date, horizon_years, |c| grouping.key(c))
}

/// Value a portfolio with the default NII horizon and build its result record
pub fn run_portfolio(
    contracts: &[Contract],
    family: &CurveFamily,
    valuation_date: NaiveDate,
    grouped: bool,
) -> BalanceResult {
    let grouping = Grouping::from_grouped(grouped);
    let valuation = value_portfolio(
        contracts,
        family,
        valuation_date,
        grouping,
        DEFAULT_NII_HORIZON_YEARS,
    );
    BalanceResult::from_valuation(&valuation, family, grouping)
}
