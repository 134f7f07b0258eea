//! Portfolio aggregation, result records and the repository boundary
//!
//! Contracts come in through [`ContractRepository`], are scheduled and valued
//! per group, and leave as a [`BalanceResult`] through [`ResultStore`].

mod grouping;
mod aggregator;
mod result;
pub mod repository;
mod engine;

pub use grouping::{GroupKey, Grouping};
pub use aggregator::{
    aggregate_by, portfolio_cashflows, run_portfolio, value_portfolio,
    GroupValuation, PortfolioValuation, SkippedContract,
};
pub use result::{BalanceResult, BalanceMetadata};
pub use repository::{
    ContractRepository, ResultStore, ResultId,
    InMemoryRepository, InMemoryResultStore, CsvContractRepository, JsonResultStore,
};
pub use engine::{IrrbbEngine, RunOutcome};
