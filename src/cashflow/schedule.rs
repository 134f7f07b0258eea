//! Payment date schedule

use chrono::{Months, NaiveDate};

/// Payment dates from `start` stepping `months_per_period` at a time
///
/// Each step adds calendar months to the previous date (clipping to month
/// end where needed); the last date is clipped to `maturity`. Returns an
/// empty schedule when `start >= maturity` or the step is zero.
pub fn payment_dates(start: NaiveDate, maturity: NaiveDate, months_per_period: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if months_per_period == 0 {
        return dates;
    }

    let step = Months::new(months_per_period);
    let mut current = start;
    while current < maturity {
        current = match current.checked_add_months(step) {
            Some(next) if next < maturity => next,
            _ => maturity,
        };
        dates.push(current);
    }
    dates
}
