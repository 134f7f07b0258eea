//! IRRBB Engine - Interest Rate Risk in the Banking Book
//!
//! This library provides:
//! - Reference curve construction with the six regulatory shock scenarios
//! - Contract cashflow schedules (French, German, bullet; fixed or floating)
//! - Economic Value of Equity (EVE) under seven scenarios
//! - Net Interest Income (NII) sensitivity over a short horizon
//! - Portfolio aggregation, whole or by (product, side), with persisted results

pub mod error;
pub mod config;
pub mod curve;
pub mod contract;
pub mod cashflow;
pub mod valuation;
pub mod portfolio;

// Re-export commonly used types
pub use error::{IrrbbError, StorageError, Result};
pub use config::{EngineConfig, ShockConfig};
pub use curve::{build_curve_family, tenor_to_years, CurveFamily, CurvePointInput, Scenario};
pub use contract::{AmortizationType, Contract, RateType, Side};
pub use cashflow::{generate_cashflows, CashflowRow, CashflowTable};
pub use valuation::{compute_eve, compute_nii, ScenarioResult};
pub use portfolio::{run_portfolio, BalanceResult, IrrbbEngine};
