//! Persisted result record of one valuation run

use super::aggregator::{PortfolioValuation, SkippedContract};
use super::grouping::Grouping;
use crate::curve::{CurveFamily, Scenario};
use crate::valuation::ScenarioResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Run metadata stored next to the headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceMetadata {
    pub contracts: usize,
    pub valued_contracts: usize,
    pub skipped: Vec<SkippedContract>,
    pub cashflow_rows: usize,
    pub grouped: bool,
    /// Group labels in aggregation order
    pub groups: Vec<String>,
    pub curve_maturities: Vec<f64>,
    pub curve_columns: Vec<String>,
    pub nii_horizon_years: f64,
}

/// Headline EVE and NII figures of one portfolio run
///
/// Values are signed: assets contribute positively, liabilities negatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub portfolio_id: Option<String>,
    pub calculated_at: DateTime<Utc>,
    pub valuation_date: NaiveDate,

    // EVE
    pub eve_base: f64,
    pub eve_parallel_up: f64,
    pub eve_parallel_down: f64,
    pub eve_short_up: f64,
    pub eve_short_down: f64,
    pub eve_steepener: f64,
    pub eve_flattener: f64,

    // NII
    pub nii_base: f64,
    pub nii_parallel_up: f64,
    pub nii_parallel_down: f64,

    pub metadata: BalanceMetadata,
}

impl BalanceResult {
    pub fn from_valuation(valuation: &PortfolioValuation, family: &CurveFamily, grouping: Grouping) -> Self {
        let eve = &valuation.eve;
        let nii = &valuation.nii;

        Self {
            portfolio_id: None,
            calculated_at: Utc::now(),
            valuation_date: valuation.valuation_date,
            eve_base: eve.get(Scenario::Base),
            eve_parallel_up: eve.get(Scenario::ParallelUp),
            eve_parallel_down: eve.get(Scenario::ParallelDown),
            eve_short_up: eve.get(Scenario::ShortUp),
            eve_short_down: eve.get(Scenario::ShortDown),
            eve_steepener: eve.get(Scenario::Steepener),
            eve_flattener: eve.get(Scenario::Flattener),
            nii_base: nii.get(Scenario::Base),
            nii_parallel_up: nii.get(Scenario::ParallelUp),
            nii_parallel_down: nii.get(Scenario::ParallelDown),
            metadata: BalanceMetadata {
                contracts: valuation.contract_count,
                valued_contracts: valuation.valued_count,
                skipped: valuation.skipped.clone(),
                cashflow_rows: valuation.cashflow_rows,
                grouped: grouping.is_grouped(),
                groups: valuation.groups.iter().map(|g| g.key.to_string()).collect(),
                curve_maturities: family.maturities().to_vec(),
                curve_columns: family.column_names(),
                nii_horizon_years: valuation.nii_horizon_years,
            },
        }
    }

    pub fn with_portfolio_id(mut self, portfolio_id: impl Into<String>) -> Self {
        self.portfolio_id = Some(portfolio_id.into());
        self
    }

    /// EVE per scenario, all seven keys
    pub fn eve(&self) -> ScenarioResult {
        [
            (Scenario::Base, self.eve_base),
            (Scenario::ParallelUp, self.eve_parallel_up),
            (Scenario::ParallelDown, self.eve_parallel_down),
            (Scenario::ShortUp, self.eve_short_up),
            (Scenario::ShortDown, self.eve_short_down),
            (Scenario::Steepener, self.eve_steepener),
            (Scenario::Flattener, self.eve_flattener),
        ]
        .into_iter()
        .collect()
    }

    /// NII per scenario, three keys
    pub fn nii(&self) -> ScenarioResult {
        [
            (Scenario::Base, self.nii_base),
            (Scenario::ParallelUp, self.nii_parallel_up),
            (Scenario::ParallelDown, self.nii_parallel_down),
        ]
        .into_iter()
        .collect()
    }

    /// Copy with every figure replaced by its absolute value
    pub fn magnitudes(&self) -> Self {
        Self {
            eve_base: self.eve_base.abs(),
            eve_parallel_up: self.eve_parallel_up.abs(),
            eve_parallel_down: self.eve_parallel_down.abs(),
            eve_short_up: self.eve_short_up.abs(),
            eve_short_down: self.eve_short_down.abs(),
            eve_steepener: self.eve_steepener.abs(),
            eve_flattener: self.eve_flattener.abs(),
            nii_base: self.nii_base.abs(),
            nii_parallel_up: self.nii_parallel_up.abs(),
            nii_parallel_down: self.nii_parallel_down.abs(),
            ..self.clone()
        }
    }

    /// Print a summary table to stdout
    pub fn print_summary(&self) {
        println!("\n=== IRRBB Result ===");
        if let Some(id) = &self.portfolio_id {
            println!("Portfolio:       {}", id);
        }
        println!("Valuation date:  {}", self.valuation_date);
        println!(
            "Contracts:       {} valued / {} loaded ({} skipped)",
            self.metadata.valued_contracts,
            self.metadata.contracts,
            self.metadata.skipped.len()
        );
        println!("Cashflow rows:   {}", self.metadata.cashflow_rows);

        println!("\n{:<16} {:>20} {:>20}", "Scenario", "EVE", "Δ vs base");
        println!("{}", "-".repeat(58));
        let eve = self.eve();
        for (scenario, value) in eve.iter() {
            println!("{:<16} {:>20.2} {:>20.2}", scenario, value, eve.delta_vs_base(scenario));
        }

        println!(
            "\n{:<16} {:>20} {:>20}   (horizon {}y)",
            "Scenario", "NII", "Δ vs base", self.metadata.nii_horizon_years
        );
        println!("{}", "-".repeat(58));
        let nii = self.nii();
        for (scenario, value) in nii.iter() {
            println!("{:<16} {:>20.2} {:>20.2}", scenario, value, nii.delta_vs_base(scenario));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShockConfig;
    use crate::contract::{AmortizationType, Contract, RateType, Side};
    use crate::curve::build_default_curve_family;
    use crate::portfolio::run_portfolio;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_result() -> BalanceResult {
        let family = build_default_curve_family(&ShockConfig::default()).unwrap();
        let contracts = vec![Contract::new(
            "C1",
            "Loans",
            Side::Asset,
            1_000_000.0,
            date(2024, 1, 1),
            date(2025, 1, 1),
            RateType::Fixed,
            AmortizationType::Bullet,
            0.05,
        )];
        run_portfolio(&contracts, &family, date(2024, 1, 1), false)
    }

    #[test]
    fn test_reference_bullet() {
        let result = reference_result();

        // t = 366/360, base rate interpolated between 1Y and 2Y
        assert_relative_eq!(result.eve_base, 1_021_393.759_847_719_1, max_relative = 1e-6);
        assert_relative_eq!(result.eve_parallel_up, 999_146.851_620_488_1, max_relative = 1e-6);
        assert!(result.eve_parallel_down > result.eve_base);
        // Paid after the one-year horizon
        assert_eq!(result.nii_base, 0.0);
        assert_eq!(result.metadata.groups, vec!["PORTFOLIO".to_string()]);
        assert_eq!(result.metadata.curve_columns.len(), 7);
    }

    #[test]
    fn test_views_and_magnitudes() {
        let mut result = reference_result().with_portfolio_id("P-1");
        result.eve_base = -5.0;
        result.nii_parallel_down = -2.0;

        assert_eq!(result.portfolio_id.as_deref(), Some("P-1"));
        assert_eq!(result.eve().len(), 7);
        assert_eq!(result.nii().len(), 3);
        assert_eq!(result.eve().get(Scenario::Base), -5.0);

        let abs = result.magnitudes();
        assert_eq!(abs.eve_base, 5.0);
        assert_eq!(abs.nii_parallel_down, 2.0);
        assert_eq!(abs.metadata, result.metadata);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(reference_result()).unwrap();
        for field in ["eve_base", "eve_flattener", "nii_parallel_down", "calculated_at", "metadata"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(json["valuation_date"], "2024-01-01");
    }
}
