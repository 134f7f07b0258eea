//! Scenario curve family

use super::interpolation::interp_flat;
use super::tenor::{default_curve_points, tenor_to_years, CurvePointInput};
use crate::config::ShockConfig;
use crate::error::{IrrbbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interest-rate scenario (one curve column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Base,
    ParallelUp,
    ParallelDown,
    ShortUp,
    ShortDown,
    Steepener,
    Flattener,
}

impl Scenario {
    /// All seven curve columns, in column order
    pub const ALL: [Scenario; 7] = [
        Scenario::Base,
        Scenario::ParallelUp,
        Scenario::ParallelDown,
        Scenario::ShortUp,
        Scenario::ShortDown,
        Scenario::Steepener,
        Scenario::Flattener,
    ];

    /// Scenarios evaluated for NII
    pub const NII: [Scenario; 3] = [Scenario::Base, Scenario::ParallelUp, Scenario::ParallelDown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Base => "base",
            Scenario::ParallelUp => "parallel_up",
            Scenario::ParallelDown => "parallel_down",
            Scenario::ShortUp => "short_up",
            Scenario::ShortDown => "short_down",
            Scenario::Steepener => "steepener",
            Scenario::Flattener => "flattener",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base curve plus the six shocked curves, rates in basis points
///
/// Maturities are strictly increasing and every column has one rate per
/// maturity. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFamily {
    maturities: Vec<f64>,
    columns: [Vec<f64>; 7],
}

impl CurveFamily {
    /// Derive the family from maturities (years) and base rates (basis points)
    pub fn from_base(maturities: Vec<f64>, base_bp: Vec<f64>, shocks: &ShockConfig) -> Result<Self> {
        if maturities.is_empty() {
            return Err(IrrbbError::EmptyCurve);
        }
        if maturities.len() != base_bp.len() {
            return Err(IrrbbError::InvalidCurve(format!(
                "{} maturities but {} rates",
                maturities.len(),
                base_bp.len()
            )));
        }
        if maturities.iter().chain(base_bp.iter()).any(|v| !v.is_finite()) {
            return Err(IrrbbError::InvalidCurve("non-finite maturity or rate".into()));
        }
        if maturities.windows(2).any(|w| w[1] <= w[0]) {
            return Err(IrrbbError::InvalidCurve(
                "maturities must be strictly increasing".into(),
            ));
        }

        let parallel = shocks.parallel_bp;
        let (steep_short, steep_long) = shocks.steepener_weights;
        let (flat_short, flat_long) = shocks.flattener_weights;

        let mut columns: [Vec<f64>; 7] = Default::default();
        for col in columns.iter_mut() {
            col.reserve(maturities.len());
        }

        for (&t, &base) in maturities.iter().zip(base_bp.iter()) {
            let short = shocks.short_shock(t);
            let long = shocks.long_shock(t);

            columns[Scenario::Base.index()].push(base);
            columns[Scenario::ParallelUp.index()].push(base + parallel);
            columns[Scenario::ParallelDown.index()].push(base - parallel);
            columns[Scenario::ShortUp.index()].push(base + short);
            columns[Scenario::ShortDown.index()].push(base - short);
            columns[Scenario::Steepener.index()].push(base + steep_short * short + steep_long * long);
            columns[Scenario::Flattener.index()].push(base + flat_short * short + flat_long * long);
        }

        // Discounting needs 1 + r > 0 everywhere
        if let Some(scenario) = Scenario::ALL
            .iter()
            .find(|s| columns[s.index()].iter().any(|&bp| !bp.is_finite() || bp <= -10_000.0))
        {
            return Err(IrrbbError::InvalidCurve(format!(
                "{} curve reaches a rate at or below -100%",
                scenario
            )));
        }

        Ok(Self { maturities, columns })
    }

    /// Maturities in years
    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    /// Rates of one scenario column, in basis points
    pub fn column(&self, scenario: Scenario) -> &[f64] {
        &self.columns[scenario.index()]
    }

    /// Interpolated rate in basis points at `t` years
    pub fn rate_bp(&self, scenario: Scenario, t: f64) -> f64 {
        interp_flat(&self.maturities, self.column(scenario), t)
    }

    /// Interpolated rate as a decimal fraction at `t` years
    pub fn rate(&self, scenario: Scenario, t: f64) -> f64 {
        self.rate_bp(scenario, t) / 10_000.0
    }

    pub fn len(&self) -> usize {
        self.maturities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maturities.is_empty()
    }

    /// Column names, used in result metadata
    pub fn column_names(&self) -> Vec<String> {
        Scenario::ALL.iter().map(|s| format!("rate_{}_curve", s)).collect()
    }
}

/// Build the curve family from `(tenor, decimal rate)` points
pub fn build_curve_family(points: &[CurvePointInput], shocks: &ShockConfig) -> Result<CurveFamily> {
    if points.is_empty() {
        return Err(IrrbbError::EmptyCurve);
    }

    let maturities = points
        .iter()
        .map(|p| tenor_to_years(&p.tenor))
        .collect::<Result<Vec<_>>>()?;
    let base_bp = points.iter().map(|p| p.rate * 10_000.0).collect();

    let family = CurveFamily::from_base(maturities, base_bp, shocks)?;
    log::debug!("built curve family with {} maturities", family.len());
    Ok(family)
}

/// Build the family from the built-in 8-point reference curve
pub fn build_default_curve_family(shocks: &ShockConfig) -> Result<CurveFamily> {
    build_curve_family(&default_curve_points(), shocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn default_family() -> CurveFamily {
        build_default_curve_family(&ShockConfig::default()).unwrap()
    }

    #[test]
    fn test_base_column_in_bp() {
        let family = default_family();
        assert_eq!(family.len(), 8);
        assert_abs_diff_eq!(family.maturities()[0], 1.0 / 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(family.column(Scenario::Base)[0], 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(family.column(Scenario::Base)[7], 370.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_symmetry() {
        let family = default_family();
        let base = family.column(Scenario::Base);
        let up = family.column(Scenario::ParallelUp);
        let down = family.column(Scenario::ParallelDown);

        for i in 0..family.len() {
            assert_abs_diff_eq!(up[i] - base[i], 225.0, epsilon = 1e-9);
            assert_abs_diff_eq!(base[i] - down[i], 225.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_shock_shapes() {
        let family = default_family();
        let base = family.column(Scenario::Base);

        for (i, &t) in family.maturities().iter().enumerate() {
            let short = 350.0 * (-t / 4.0).exp();
            let long = 200.0 * (1.0 - (-t / 4.0).exp());

            assert_abs_diff_eq!(family.column(Scenario::ShortUp)[i], base[i] + short, epsilon = 1e-9);
            assert_abs_diff_eq!(family.column(Scenario::ShortDown)[i], base[i] - short, epsilon = 1e-9);
            assert_abs_diff_eq!(
                family.column(Scenario::Steepener)[i],
                base[i] - 0.65 * short + 0.9 * long,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(
                family.column(Scenario::Flattener)[i],
                base[i] + 0.8 * short - 0.6 * long,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_custom_shocks() {
        let shocks = ShockConfig {
            parallel_bp: 100.0,
            ..ShockConfig::default()
        };
        let family = build_default_curve_family(&shocks).unwrap();
        let diff = family.column(Scenario::ParallelUp)[2] - family.column(Scenario::Base)[2];
        assert_abs_diff_eq!(diff, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rate_lookup() {
        let family = default_family();
        // Halfway between 1Y (275bp) and 2Y (300bp)
        assert_abs_diff_eq!(family.rate_bp(Scenario::Base, 1.5), 287.5, epsilon = 1e-9);
        assert_abs_diff_eq!(family.rate(Scenario::Base, 1.5), 0.02875, epsilon = 1e-12);
        // Flat beyond 10Y and before 1M
        assert_abs_diff_eq!(family.rate_bp(Scenario::Base, 30.0), 370.0, epsilon = 1e-9);
        assert_abs_diff_eq!(family.rate_bp(Scenario::Base, 0.0), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_malformed_tenor_aborts() {
        let points = vec![CurvePointInput::new("1Y", 0.02), CurvePointInput::new("2W", 0.03)];
        let err = build_curve_family(&points, &ShockConfig::default()).unwrap_err();
        assert!(matches!(err, IrrbbError::MalformedTenor { .. }));
    }

    #[test]
    fn test_invalid_curves() {
        let shocks = ShockConfig::default();
        assert!(matches!(build_curve_family(&[], &shocks), Err(IrrbbError::EmptyCurve)));

        let unordered = vec![CurvePointInput::new("2Y", 0.02), CurvePointInput::new("1Y", 0.03)];
        assert!(matches!(
            build_curve_family(&unordered, &shocks),
            Err(IrrbbError::InvalidCurve(_))
        ));

        assert!(CurveFamily::from_base(vec![1.0, 2.0], vec![100.0], &shocks).is_err());
    }

    #[test]
    fn test_scenario_names() {
        let names: Vec<_> = Scenario::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            ["base", "parallel_up", "parallel_down", "short_up", "short_down", "steepener", "flattener"]
        );
        assert_eq!(default_family().column_names()[0], "rate_base_curve");
    }
}
