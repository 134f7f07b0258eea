//! Reference curve construction
//!
//! Builds the seven-column scenario curve family (base plus six regulatory
//! shocks) from a flat set of `(tenor, rate)` points.

mod tenor;
mod interpolation;
mod family;
pub mod loader;

pub use tenor::{tenor_to_years, CurvePointInput, DEFAULT_TENORS, DEFAULT_RATES, default_curve_points};
pub use interpolation::interp_flat;
pub use family::{CurveFamily, Scenario, build_curve_family, build_default_curve_family};
pub use loader::{load_curve_points, load_curve_points_from_reader};
