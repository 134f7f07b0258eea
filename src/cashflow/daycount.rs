//! Day-count helpers

use chrono::{Datelike, NaiveDate};

/// 30/360 year fraction between two dates
///
/// Day-of-month is capped at 30 on both ends.
pub fn year_fraction_30_360(start: NaiveDate, end: NaiveDate) -> f64 {
    let d1 = start.day().min(30) as i64;
    let d2 = end.day().min(30) as i64;
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;
    let y1 = start.year() as i64;
    let y2 = end.year() as i64;

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days as f64 / 360.0
}

/// Actual days from `valuation_date` to `payment_date` over 360, floored at 0
pub fn years_until(valuation_date: NaiveDate, payment_date: NaiveDate) -> f64 {
    let days = (payment_date - valuation_date).num_days();
    if days < 0 {
        0.0
    } else {
        days as f64 / 360.0
    }
}
