//! Cashflow schedule generation for a single contract

use super::daycount::{year_fraction_30_360, years_until};
use super::schedule::payment_dates;
use super::table::{CashflowRow, CashflowTable};
use crate::contract::{AmortizationType, Contract, RateType};
use crate::curve::{CurveFamily, Scenario};
use crate::error::{IrrbbError, Result};
use chrono::NaiveDate;

/// Shortest term used to look up the floating fixing rate
const MIN_FIXING_TERM_YEARS: f64 = 0.01;

/// Per-period coupon rate of a contract
///
/// Fixed: `spread / frequency`. Floating: base curve rate at the contract term
/// plus spread, over frequency. The floating rate is fixed once for the whole
/// life of the contract.
pub fn period_rate(contract: &Contract, family: &CurveFamily) -> f64 {
    let frequency = contract.effective_frequency() as f64;
    let annual = match contract.rate_type {
        RateType::Fixed => contract.spread,
        RateType::Floating => {
            let term = contract.term_years().max(MIN_FIXING_TERM_YEARS);
            family.rate(Scenario::Base, term) + contract.spread
        }
    };
    annual / frequency
}

/// Principal repayment rule for the life of the contract
enum Repayment {
    /// Level installment; principal is the installment less interest
    Installment(f64),
    /// Level principal every period
    LevelPrincipal(f64),
    /// Everything at the last period
    AtMaturity,
}

impl Repayment {
    fn for_contract(contract: &Contract, rate: f64, n_periods: usize) -> Result<Self> {
        let notional = contract.notional;
        match contract.amortization {
            AmortizationType::French => {
                let denominator = 1.0 - (1.0 + rate).powi(-(n_periods as i32));
                if rate == 0.0 || denominator == 0.0 || !denominator.is_finite() {
                    return Err(IrrbbError::degenerate(
                        &contract.contract_id,
                        format!("level installment undefined for period rate {}", rate),
                    ));
                }
                Ok(Repayment::Installment(notional * rate / denominator))
            }
            AmortizationType::German => Ok(Repayment::LevelPrincipal(notional / n_periods as f64)),
            AmortizationType::Bullet => Ok(Repayment::AtMaturity),
        }
    }

    fn principal(&self, interest: f64, outstanding: f64, is_last: bool) -> f64 {
        match *self {
            Repayment::Installment(installment) => installment - interest,
            Repayment::LevelPrincipal(amount) => amount,
            Repayment::AtMaturity => {
                if is_last {
                    outstanding
                } else {
                    0.0
                }
            }
        }
    }
}

/// Generate the cashflow schedule, reporting why a contract cannot be scheduled
///
/// Fails with `DegenerateSchedule` when maturity is not after start, the
/// payment step is zero months, or any amount would be non-finite.
pub fn try_generate_cashflows(
    contract: &Contract,
    family: &CurveFamily,
    valuation_date: NaiveDate,
) -> Result<CashflowTable> {
    let id = contract.contract_id.as_str();

    let months = contract.months_per_period();
    if months == 0 {
        return Err(IrrbbError::degenerate(
            id,
            format!("frequency {} gives a zero-month payment period", contract.frequency),
        ));
    }
    if contract.start_date >= contract.maturity_date {
        return Err(IrrbbError::degenerate(
            id,
            format!(
                "maturity {} is not after start {}",
                contract.maturity_date, contract.start_date
            ),
        ));
    }

    let dates = payment_dates(contract.start_date, contract.maturity_date, months);
    if dates.is_empty() {
        return Err(IrrbbError::degenerate(id, "no payment dates"));
    }

    let n_periods = dates.len();
    let rate = period_rate(contract, family);
    if !rate.is_finite() {
        return Err(IrrbbError::degenerate(id, "period rate is not finite"));
    }

    let repayment = Repayment::for_contract(contract, rate, n_periods)?;
    let sign = contract.side.sign();
    let is_floating = contract.is_floating();

    let mut table = CashflowTable::with_capacity(n_periods);
    let mut outstanding = contract.notional;
    let mut period_start = contract.start_date;

    for (i, &pay_date) in dates.iter().enumerate() {
        let interest = outstanding * rate;
        let principal = repayment.principal(interest, outstanding, i + 1 == n_periods);

        let row = CashflowRow {
            contract_id: contract.contract_id.clone(),
            period_start,
            period_end: pay_date,
            year_fraction: year_fraction_30_360(period_start, pay_date),
            t: years_until(valuation_date, pay_date),
            outstanding_start: outstanding * sign,
            interest: interest * sign,
            principal: principal * sign,
            cashflow: (interest + principal) * sign,
            rate_per_period: rate,
            is_floating,
            side: contract.side,
        };
        if !row.is_finite() {
            return Err(IrrbbError::degenerate(
                id,
                format!("non-finite amount in period ending {}", pay_date),
            ));
        }
        table.add_row(row);

        outstanding = (outstanding - principal).max(0.0);
        period_start = pay_date;
    }

    log::debug!(
        "contract {}: {} periods at period rate {:.6}",
        id,
        n_periods,
        rate
    );
    Ok(table)
}

/// Generate the cashflow schedule; degenerate contracts give an empty table
pub fn generate_cashflows(
    contract: &Contract,
    family: &CurveFamily,
    valuation_date: NaiveDate,
) -> CashflowTable {
    match try_generate_cashflows(contract, family, valuation_date) {
        Ok(table) => table,
        Err(e) => {
            log::debug!("{}", e);
            CashflowTable::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShockConfig;
    use crate::contract::Side;
    use crate::curve::build_default_curve_family;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn family() -> CurveFamily {
        build_default_curve_family(&ShockConfig::default()).unwrap()
    }

    fn contract(side: Side, rate_type: RateType, amortization: AmortizationType) -> Contract {
        Contract::new(
            "C001",
            "Loans and advances",
            side,
            1_000_000.0,
            date(2024, 1, 1),
            date(2029, 1, 1),
            rate_type,
            amortization,
            0.05,
        )
    }

    #[test]
    fn test_single_bullet_period() {
        let c = Contract {
            maturity_date: date(2025, 1, 1),
            ..contract(Side::Asset, RateType::Fixed, AmortizationType::Bullet)
        };
        let table = generate_cashflows(&c, &family(), date(2024, 1, 1));

        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_abs_diff_eq!(row.principal, 1_000_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.interest, 50_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(row.cashflow, 1_050_000.0, epsilon = 1e-6);
        assert_eq!(row.year_fraction, 1.0);
        assert_abs_diff_eq!(row.t, 366.0 / 360.0, epsilon = 1e-12);
        assert!(!row.is_floating);
    }

    #[test]
    fn test_german_principal_conservation() {
        let c = contract(Side::Asset, RateType::Fixed, AmortizationType::German).with_frequency(4);
        let table = generate_cashflows(&c, &family(), date(2024, 1, 1));

        assert_eq!(table.len(), 20);
        for row in &table {
            assert_relative_eq!(row.principal, 50_000.0, max_relative = 1e-12);
            assert_relative_eq!(row.interest, row.outstanding_start * 0.0125, max_relative = 1e-12);
        }
        assert_relative_eq!(table.summary().total_principal, 1_000_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_bullet_principal_conservation() {
        let c = contract(Side::Asset, RateType::Fixed, AmortizationType::Bullet).with_frequency(2);
        let table = generate_cashflows(&c, &family(), date(2024, 1, 1));

        assert_eq!(table.len(), 10);
        for row in &table.rows[..9] {
            assert_eq!(row.principal, 0.0);
            assert_abs_diff_eq!(row.interest, 25_000.0, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(table.rows[9].principal, 1_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(table.summary().total_principal, 1_000_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_french_level_installment() {
        let c = contract(Side::Asset, RateType::Fixed, AmortizationType::French).with_frequency(12);
        let table = generate_cashflows(&c, &family(), date(2024, 1, 1));

        let r: f64 = 0.05 / 12.0;
        let n: i32 = 60;
        let installment = 1_000_000.0 * r / (1.0 - (1.0 + r).powi(-n));

        assert_eq!(table.len(), n as usize);
        for row in &table {
            assert_relative_eq!(row.interest + row.principal, installment, max_relative = 1e-9);
        }

        let last = table.rows.last().unwrap();
        let residual = last.outstanding_start - last.principal;
        assert_abs_diff_eq!(residual, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_liability_rows_non_positive() {
        for amortization in [AmortizationType::French, AmortizationType::German, AmortizationType::Bullet] {
            let c = contract(Side::Liability, RateType::Floating, amortization).with_frequency(4);
            let table = generate_cashflows(&c, &family(), date(2024, 1, 1));
            assert!(!table.is_empty());
            for row in &table {
                assert!(row.outstanding_start <= 0.0);
                assert!(row.interest <= 0.0);
                assert!(row.principal <= 1e-9);
                assert!(row.cashflow <= 0.0);
                assert_eq!(row.side, Side::Liability);
            }
        }
    }

    #[test]
    fn test_asset_rows_non_negative() {
        for amortization in [AmortizationType::French, AmortizationType::German, AmortizationType::Bullet] {
            let c = contract(Side::Asset, RateType::Fixed, amortization);
            for row in &generate_cashflows(&c, &family(), date(2024, 1, 1)) {
                assert!(row.interest >= 0.0);
                assert!(row.principal >= -1e-9);
                assert!(row.cashflow >= 0.0);
            }
        }
    }

    #[test]
    fn test_floating_rate_fixed_once() {
        let c = contract(Side::Asset, RateType::Floating, AmortizationType::German).with_frequency(2);
        let fam = family();
        let table = generate_cashflows(&c, &fam, date(2024, 1, 1));

        // 1827 days / 365 sits just past the 5Y node (350bp)
        let expected = (fam.rate(Scenario::Base, 1827.0 / 365.0) + 0.05) / 2.0;
        assert_abs_diff_eq!(expected, (0.035 + 0.05) / 2.0, epsilon = 1e-5);
        for row in &table {
            assert!(row.is_floating);
            assert_eq!(row.rate_per_period, table.rows[0].rate_per_period);
            assert_abs_diff_eq!(row.rate_per_period, expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_past_dates_floor_at_zero() {
        let c = contract(Side::Asset, RateType::Fixed, AmortizationType::German);
        let table = generate_cashflows(&c, &family(), date(2026, 6, 1));

        assert_eq!(table.len(), 5);
        assert_eq!(table.rows[0].t, 0.0);
        assert_eq!(table.rows[1].t, 0.0);
        assert!(table.rows[2].t > 0.0);
    }

    #[test]
    fn test_degenerate_contracts() {
        let fam = family();
        let val = date(2024, 1, 1);

        let same_day = Contract {
            maturity_date: date(2024, 1, 1),
            ..contract(Side::Asset, RateType::Fixed, AmortizationType::Bullet)
        };
        assert!(generate_cashflows(&same_day, &fam, val).is_empty());
        assert!(matches!(
            try_generate_cashflows(&same_day, &fam, val),
            Err(IrrbbError::DegenerateSchedule { .. })
        ));

        let too_frequent = contract(Side::Asset, RateType::Fixed, AmortizationType::Bullet).with_frequency(52);
        assert!(try_generate_cashflows(&too_frequent, &fam, val).is_err());

        let zero_rate_french = Contract {
            spread: 0.0,
            ..contract(Side::Asset, RateType::Fixed, AmortizationType::French)
        };
        assert!(matches!(
            try_generate_cashflows(&zero_rate_french, &fam, val),
            Err(IrrbbError::DegenerateSchedule { .. })
        ));
    }

    #[test]
    fn test_non_positive_frequency_is_annual() {
        let c = contract(Side::Asset, RateType::Fixed, AmortizationType::German).with_frequency(0);
        let table = generate_cashflows(&c, &family(), date(2024, 1, 1));
        assert_eq!(table.len(), 5);
        assert_abs_diff_eq!(table.rows[0].rate_per_period, 0.05, epsilon = 1e-15);
    }
}
