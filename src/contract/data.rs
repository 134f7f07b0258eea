//! Loan and deposit contract records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interest-rate type of the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateType {
    /// Coupon is the spread alone
    Fixed,
    /// Coupon is the reference curve rate plus spread, fixed once at the curve snapshot
    Floating,
}

/// Principal repayment convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmortizationType {
    /// Level installment (annuity)
    French,
    /// Level principal
    German,
    /// All principal at maturity
    Bullet,
}

/// Balance sheet side; drives the sign of every generated amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Asset,
    Liability,
}

impl Side {
    /// +1 for assets, -1 for liabilities
    pub fn sign(&self) -> f64 {
        match self {
            Side::Asset => 1.0,
            Side::Liability => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Asset => "ASSET",
            Side::Liability => "LIABILITY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSET" => Ok(Side::Asset),
            "LIABILITY" => Ok(Side::Liability),
            other => Err(format!("side must be ASSET or LIABILITY, got '{}'", other)),
        }
    }
}

impl FromStr for RateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIXED" => Ok(RateType::Fixed),
            "FLOATING" => Ok(RateType::Floating),
            other => Err(format!("rate type must be FIXED or FLOATING, got '{}'", other)),
        }
    }
}

impl FromStr for AmortizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FRENCH" => Ok(AmortizationType::French),
            "GERMAN" => Ok(AmortizationType::German),
            "BULLET" => Ok(AmortizationType::Bullet),
            other => Err(format!(
                "amortization must be FRENCH, GERMAN or BULLET, got '{}'",
                other
            )),
        }
    }
}

/// One loan or deposit contract
///
/// Owned by the external repository; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract number
    pub contract_id: String,

    /// Product name used for per-product breakdowns
    pub product: String,

    pub side: Side,

    /// Original principal
    pub notional: f64,

    pub start_date: NaiveDate,

    pub maturity_date: NaiveDate,

    pub rate_type: RateType,

    pub amortization: AmortizationType,

    /// Annual coupon spread as a decimal, added to the reference rate for floating contracts
    pub spread: f64,

    /// Coupon payments per year; non-positive values mean annual
    #[serde(default = "default_frequency")]
    pub frequency: i32,

    /// Reference curve name (informational)
    #[serde(default)]
    pub curve_id: String,
}

fn default_frequency() -> i32 {
    1
}

impl Contract {
    /// Create a contract with annual payments and no curve name
    pub fn new(
        contract_id: impl Into<String>,
        product: impl Into<String>,
        side: Side,
        notional: f64,
        start_date: NaiveDate,
        maturity_date: NaiveDate,
        rate_type: RateType,
        amortization: AmortizationType,
        spread: f64,
    ) -> Self {
        Self {
            contract_id: contract_id.into(),
            product: product.into(),
            side,
            notional,
            start_date,
            maturity_date,
            rate_type,
            amortization,
            spread,
            frequency: 1,
            curve_id: String::new(),
        }
    }

    /// Set payments per year
    pub fn with_frequency(mut self, frequency: i32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the reference curve name
    pub fn with_curve(mut self, curve_id: impl Into<String>) -> Self {
        self.curve_id = curve_id.into();
        self
    }

    /// Payments per year, non-positive values floored to 1
    pub fn effective_frequency(&self) -> u32 {
        if self.frequency <= 0 {
            1
        } else {
            self.frequency as u32
        }
    }

    /// Months between payments (integer `12 / frequency`; zero above monthly)
    pub fn months_per_period(&self) -> u32 {
        12 / self.effective_frequency()
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.rate_type, RateType::Floating)
    }

    /// Actual days between start and maturity over 365
    pub fn term_years(&self) -> f64 {
        (self.maturity_date - self.start_date).num_days() as f64 / 365.0
    }
}
