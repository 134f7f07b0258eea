//! Scenario valuation of cashflow tables
//!
//! - **EVE**: present value of every row under each of the seven curves
//! - **NII**: interest income inside a short horizon, re-rated for floating rows

mod scenario;
mod eve;
mod nii;

pub use scenario::ScenarioResult;
pub use eve::{compute_eve, discount_factor};
pub use nii::{compute_nii, DEFAULT_NII_HORIZON_YEARS};
