//! Run orchestration: load once, build the curve family once, value, persist

use super::aggregator::{value_portfolio, PortfolioValuation};
use super::grouping::Grouping;
use super::repository::{ContractRepository, ResultId, ResultStore};
use super::result::BalanceResult;
use crate::config::EngineConfig;
use crate::contract::Contract;
use crate::curve::{build_curve_family, build_default_curve_family, CurveFamily};
use crate::error::Result;
use chrono::NaiveDate;

/// Everything produced by one persisted run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub id: ResultId,
    pub result: BalanceResult,
    pub valuation: PortfolioValuation,
}

/// Valuation engine with a pre-built curve family
///
/// The family is derived once from the configuration and reused for every
/// portfolio valued through this engine.
#[derive(Debug, Clone)]
pub struct IrrbbEngine {
    config: EngineConfig,
    family: CurveFamily,
}

impl IrrbbEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let family = match &config.curve {
            Some(points) => build_curve_family(points, &config.shocks)?,
            None => build_default_curve_family(&config.shocks)?,
        };
        Ok(Self { config, family })
    }

    /// Use an already-built family instead of the configured curve
    pub fn with_family(config: EngineConfig, family: CurveFamily) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, family })
    }

    pub fn family(&self) -> &CurveFamily {
        &self.family
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grouping(&self) -> Grouping {
        Grouping::from_grouped(self.config.grouped)
    }

    /// Value contracts without touching storage
    pub fn value(&self, contracts: &[Contract], valuation_date: NaiveDate) -> PortfolioValuation {
        value_portfolio(
            contracts,
            &self.family,
            valuation_date,
            self.grouping(),
            self.config.nii_horizon_years,
        )
    }

    /// Load a portfolio, value it and save the result
    ///
    /// Returns `Ok(None)` and saves nothing when the portfolio has no
    /// contracts or none of them produced cashflows. Storage errors are
    /// returned unchanged.
    pub fn run(
        &self,
        repository: &dyn ContractRepository,
        store: &dyn ResultStore,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Option<RunOutcome>> {
        let contracts = repository.load_contracts(portfolio_id)?;
        if contracts.is_empty() {
            log::warn!("portfolio {} has no contracts", portfolio_id);
            return Ok(None);
        }
        log::info!(
            "valuing portfolio {} ({} contracts) as of {}",
            portfolio_id,
            contracts.len(),
            valuation_date
        );

        let valuation = self.value(&contracts, valuation_date);
        if valuation.cashflow_rows == 0 {
            log::warn!(
                "portfolio {} produced no cashflows ({} contracts skipped)",
                portfolio_id,
                valuation.skipped.len()
            );
            return Ok(None);
        }

        let result = BalanceResult::from_valuation(&valuation, &self.family, self.grouping())
            .with_portfolio_id(portfolio_id);
        let id = store.save_result(&result)?;

        Ok(Some(RunOutcome { id, result, valuation }))
    }
}
