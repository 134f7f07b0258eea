//! Economic Value of Equity under the seven curve scenarios

use super::scenario::ScenarioResult;
use crate::cashflow::CashflowTable;
use crate::curve::{CurveFamily, Scenario};

/// Discount factor `(1 + rate)^(-t)` for an annually compounded rate
pub fn discount_factor(rate: f64, t: f64) -> f64 {
    (1.0 + rate).powf(-t)
}

fn present_value(table: &CashflowTable, family: &CurveFamily, scenario: Scenario) -> f64 {
    table
        .iter()
        .map(|row| row.cashflow * discount_factor(family.rate(scenario, row.t), row.t))
        .sum()
}

/// Present value of the table under every curve of the family
///
/// Each row is discounted at the scenario rate interpolated at its own `t`;
/// rows are independent, so the result is linear in the table.
pub fn compute_eve(table: &CashflowTable, family: &CurveFamily) -> ScenarioResult {
    Scenario::ALL
        .iter()
        .map(|&scenario| (scenario, present_value(table, family, scenario)))
        .collect()
}
