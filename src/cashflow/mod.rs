//! Contractual cashflow generation for one contract at a time

mod daycount;
mod schedule;
mod table;
mod generator;

pub use daycount::{year_fraction_30_360, years_until};
pub use schedule::payment_dates;
pub use table::{CashflowRow, CashflowTable, CashflowSummary};
pub use generator::{generate_cashflows, try_generate_cashflows, period_rate};
