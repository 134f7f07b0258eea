//! Cashflow output structures

use crate::contract::Side;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scheduled payment of one contract
///
/// Monetary fields carry the side sign: positive for assets, negative for
/// liabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    pub contract_id: String,

    // Timing
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// 30/360 accrual fraction of the period
    pub year_fraction: f64,
    /// Years (actual/360) from valuation date to payment, floored at 0
    pub t: f64,

    // Amounts
    pub outstanding_start: f64,
    pub interest: f64,
    pub principal: f64,
    pub cashflow: f64,

    // Rate
    pub rate_per_period: f64,
    pub is_floating: bool,

    pub side: Side,
}

impl CashflowRow {
    /// Payment date of the row
    pub fn payment_date(&self) -> NaiveDate {
        self.period_end
    }

    /// 1.0 for floating rows, 0.0 otherwise
    pub fn floating_weight(&self) -> f64 {
        if self.is_floating {
            1.0
        } else {
            0.0
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        [
            self.year_fraction,
            self.t,
            self.outstanding_start,
            self.interest,
            self.principal,
            self.cashflow,
            self.rate_per_period,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Ordered rows for one or more contracts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowTable {
    pub rows: Vec<CashflowRow>,
}

impl CashflowTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn add_row(&mut self, row: CashflowRow) {
        self.rows.push(row);
    }

    /// Append all rows of another table, keeping order
    pub fn extend(&mut self, other: CashflowTable) {
        self.rows.extend(other.rows);
    }

    /// Concatenate tables in order
    pub fn concat<I: IntoIterator<Item = CashflowTable>>(tables: I) -> Self {
        let mut out = CashflowTable::new();
        for table in tables {
            out.extend(table);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CashflowRow> {
        self.rows.iter()
    }

    /// Get summary statistics
    pub fn summary(&self) -> CashflowSummary {
        CashflowSummary {
            rows: self.rows.len(),
            total_interest: self.rows.iter().map(|r| r.interest).sum(),
            total_principal: self.rows.iter().map(|r| r.principal).sum(),
            total_cashflow: self.rows.iter().map(|r| r.cashflow).sum(),
            last_payment: self.rows.iter().map(|r| r.payment_date()).max(),
        }
    }
}

impl<'a> IntoIterator for &'a CashflowTable {
    type Item = &'a CashflowRow;
    type IntoIter = std::slice::Iter<'a, CashflowRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Summary statistics for a cashflow table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSummary {
    pub rows: usize,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_cashflow: f64,
    pub last_payment: Option<NaiveDate>,
}
