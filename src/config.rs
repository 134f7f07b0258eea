//! Engine configuration
//!
//! Regulatory shock parameters and run options. Every field has a default so a
//! partial JSON file only overrides what it names.

use crate::curve::CurvePointInput;
use crate::error::{IrrbbError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_parallel_bp() -> f64 {
    225.0
}

fn default_short_bp() -> f64 {
    350.0
}

fn default_long_bp() -> f64 {
    200.0
}

fn default_decay_years() -> f64 {
    4.0
}

fn default_steepener_weights() -> (f64, f64) {
    (-0.65, 0.9)
}

fn default_flattener_weights() -> (f64, f64) {
    (0.8, -0.6)
}

fn default_horizon() -> f64 {
    1.0
}

/// Shock magnitudes and shape parameters for the six shocked curves
///
/// Defaults are the EUR outward shocks: parallel 225bp, short 350bp, long 200bp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockConfig {
    /// Parallel shock in basis points
    #[serde(default = "default_parallel_bp")]
    pub parallel_bp: f64,

    /// Short-end shock magnitude in basis points
    #[serde(default = "default_short_bp")]
    pub short_bp: f64,

    /// Long-end shock magnitude in basis points
    #[serde(default = "default_long_bp")]
    pub long_bp: f64,

    /// Decay constant (years) of the short/long shock shapes
    #[serde(default = "default_decay_years")]
    pub decay_years: f64,

    /// (short, long) weights of the steepener
    #[serde(default = "default_steepener_weights")]
    pub steepener_weights: (f64, f64),

    /// (short, long) weights of the flattener
    #[serde(default = "default_flattener_weights")]
    pub flattener_weights: (f64, f64),
}

impl ShockConfig {
    /// EUR regulatory outward shocks
    pub fn eur() -> Self {
        Self {
            parallel_bp: default_parallel_bp(),
            short_bp: default_short_bp(),
            long_bp: default_long_bp(),
            decay_years: default_decay_years(),
            steepener_weights: default_steepener_weights(),
            flattener_weights: default_flattener_weights(),
        }
    }

    /// Short-end shock at maturity `t`: `short · exp(-t / decay)`
    pub fn short_shock(&self, t: f64) -> f64 {
        self.short_bp * (-t / self.decay_years).exp()
    }

    /// Long-end shock at maturity `t`: `long · (1 - exp(-t / decay))`
    pub fn long_shock(&self, t: f64) -> f64 {
        self.long_bp * (1.0 - (-t / self.decay_years).exp())
    }

    fn validate(&self) -> Result<()> {
        let values = [
            self.parallel_bp,
            self.short_bp,
            self.long_bp,
            self.decay_years,
            self.steepener_weights.0,
            self.steepener_weights.1,
            self.flattener_weights.0,
            self.flattener_weights.1,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(IrrbbError::Config("shock parameters must be finite".into()));
        }
        if self.decay_years <= 0.0 {
            return Err(IrrbbError::Config(format!(
                "decay_years must be positive, got {}",
                self.decay_years
            )));
        }
        Ok(())
    }
}

impl Default for ShockConfig {
    fn default() -> Self {
        Self::eur()
    }
}

/// Options for one valuation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub shocks: ShockConfig,

    /// NII horizon in years (rows with `t <= horizon` are included)
    #[serde(default = "default_horizon")]
    pub nii_horizon_years: f64,

    /// Aggregate by (product, side) instead of as one pool
    #[serde(default)]
    pub grouped: bool,

    /// Reference curve points; `None` uses the built-in default curve
    #[serde(default)]
    pub curve: Option<Vec<CurvePointInput>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shocks: ShockConfig::default(),
            nii_horizon_years: default_horizon(),
            grouped: false,
            curve: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| IrrbbError::Config(format!("{}: {}", path.display(), e)))?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| IrrbbError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| IrrbbError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.shocks.validate()?;
        if !self.nii_horizon_years.is_finite() || self.nii_horizon_years < 0.0 {
            return Err(IrrbbError::Config(format!(
                "nii_horizon_years must be a non-negative number, got {}",
                self.nii_horizon_years
            )));
        }
        Ok(())
    }
}
