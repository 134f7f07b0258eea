//! Tenor labels and raw curve points

use crate::error::{IrrbbError, Result};
use serde::{Deserialize, Serialize};

/// Tenors of the built-in reference curve
pub const DEFAULT_TENORS: [&str; 8] = ["1M", "3M", "6M", "1Y", "2Y", "3Y", "5Y", "10Y"];

/// Annual rates (decimal) of the built-in reference curve
pub const DEFAULT_RATES: [f64; 8] = [0.02, 0.0225, 0.025, 0.0275, 0.03, 0.032, 0.035, 0.037];

/// A `(tenor, rate)` input point, rate as a decimal fraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePointInput {
    pub tenor: String,
    pub rate: f64,
}

impl CurvePointInput {
    pub fn new(tenor: impl Into<String>, rate: f64) -> Self {
        Self {
            tenor: tenor.into(),
            rate,
        }
    }
}

/// The default 8-point reference curve
pub fn default_curve_points() -> Vec<CurvePointInput> {
    DEFAULT_TENORS
        .iter()
        .zip(DEFAULT_RATES.iter())
        .map(|(tenor, &rate)| CurvePointInput::new(*tenor, rate))
        .collect()
}

/// Convert a tenor label such as `6M` or `10Y` to years
///
/// Case-insensitive, surrounding whitespace ignored. Months divide by 12.
pub fn tenor_to_years(tenor: &str) -> Result<f64> {
    let malformed = || IrrbbError::MalformedTenor {
        tenor: tenor.to_string(),
    };

    let label = tenor.trim().to_ascii_uppercase();
    let unit = label.chars().last().ok_or_else(malformed)?;
    let number: f64 = label[..label.len() - unit.len_utf8()]
        .trim()
        .parse()
        .map_err(|_| malformed())?;

    if !number.is_finite() {
        return Err(malformed());
    }

    match unit {
        'M' => Ok(number / 12.0),
        'Y' => Ok(number),
        _ => Err(malformed()),
    }
}
