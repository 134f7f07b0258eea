//! Contract records and contract file loading

mod data;
pub mod loader;

pub use data::{Contract, RateType, AmortizationType, Side};
pub use loader::{load_contracts, load_contracts_from_reader};
