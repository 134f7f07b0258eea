//! Aggregation keys

use crate::contract::{Contract, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the single group used for whole-portfolio aggregation
pub const PORTFOLIO_GROUP: &str = "PORTFOLIO";

/// Key of one aggregation unit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub product: String,
    /// `None` when assets and liabilities are pooled
    pub side: Option<Side>,
}

impl GroupKey {
    /// The single whole-portfolio group
    pub fn portfolio() -> Self {
        Self {
            product: PORTFOLIO_GROUP.to_string(),
            side: None,
        }
    }

    pub fn product_side(product: impl Into<String>, side: Side) -> Self {
        Self {
            product: product.into(),
            side: Some(side),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "{} / {}", self.product, side),
            None => f.write_str(&self.product),
        }
    }
}

/// Built-in aggregation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Everything in one group
    WholePortfolio,
    /// One group per (product, side)
    ProductSide,
}

impl Grouping {
    pub fn from_grouped(grouped: bool) -> Self {
        if grouped {
            Grouping::ProductSide
        } else {
            Grouping::WholePortfolio
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, Grouping::ProductSide)
    }

    /// Key of a contract under this mode
    pub fn key(&self, contract: &Contract) -> GroupKey {
        match self {
            Grouping::WholePortfolio => GroupKey::portfolio(),
            Grouping::ProductSide => GroupKey::product_side(contract.product.clone(), contract.side),
        }
    }
}
