//! Net Interest Income sensitivity over a short horizon

use super::scenario::ScenarioResult;
use crate::cashflow::{CashflowRow, CashflowTable};
use crate::curve::{CurveFamily, Scenario};

/// Default NII horizon in years
pub const DEFAULT_NII_HORIZON_YEARS: f64 = 1.0;

fn repriced_interest(row: &CashflowRow, family: &CurveFamily, scenario: Scenario) -> f64 {
    let delta = family.rate(scenario, row.t) - family.rate(Scenario::Base, row.t);
    let repricing = row.outstanding_start * delta * row.year_fraction * row.floating_weight();
    row.interest + repricing
}

/// Interest income of rows paid within `horizon_years`, per NII scenario
///
/// Only floating rows are re-rated: each gets `outstanding · Δr · year_fraction`
/// on top of its contractual interest, where `Δr` is the scenario rate minus the
/// base rate at the row's `t`. Fixed rows keep their contractual interest.
/// The horizon is inclusive.
pub fn compute_nii(table: &CashflowTable, family: &CurveFamily, horizon_years: f64) -> ScenarioResult {
    let in_horizon: Vec<&CashflowRow> = table.iter().filter(|row| row.t <= horizon_years).collect();

    if in_horizon.is_empty() {
        return ScenarioResult::zeros(&Scenario::NII);
    }

    Scenario::NII
        .iter()
        .map(|&scenario| {
            let income = in_horizon
                .iter()
                .map(|row| repriced_interest(row, family, scenario))
                .sum();
            (scenario, income)
        })
        .collect()
}
