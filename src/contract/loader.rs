//! Load contracts from a CSV contract file
//!
//! Expected header:
//! `ContractId,Product,Side,Notional,StartDate,MaturityDate,RateType,Amortization,Spread,Curve,Frequency`
//!
//! Every row is validated before anything is returned; all row problems are
//! reported together so a file is either accepted whole or rejected whole.

use super::{AmortizationType, Contract, RateType, Side};
use crate::error::StorageError;
use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

/// Columns every contract file must carry
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "ContractId",
    "Product",
    "Side",
    "Notional",
    "StartDate",
    "MaturityDate",
    "RateType",
    "Amortization",
    "Spread",
    "Curve",
    "Frequency",
];

/// Raw CSV row; fields stay strings so bad values become row errors, not parse aborts
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ContractId")]
    contract_id: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Side")]
    side: String,
    #[serde(rename = "Notional")]
    notional: String,
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "MaturityDate")]
    maturity_date: String,
    #[serde(rename = "RateType")]
    rate_type: String,
    #[serde(rename = "Amortization")]
    amortization: String,
    #[serde(rename = "Spread")]
    spread: String,
    #[serde(rename = "Curve")]
    curve: String,
    #[serde(rename = "Frequency")]
    frequency: String,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_number(field: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{} must be a number, got '{}'", field, value))
}

impl CsvRow {
    /// Map onto a contract, collecting every field error of the row
    fn to_contract(self) -> Result<Contract, Vec<String>> {
        let mut errors = Vec::new();

        if self.contract_id.trim().is_empty() {
            errors.push("ContractId is empty".to_string());
        }

        let side = self.side.parse::<Side>().map_err(|e| errors.push(e)).ok();
        let rate_type = self.rate_type.parse::<RateType>().map_err(|e| errors.push(e)).ok();
        let amortization = self
            .amortization
            .parse::<AmortizationType>()
            .map_err(|e| errors.push(e))
            .ok();

        let notional = match parse_number("Notional", &self.notional) {
            Ok(v) if v < 0.0 => {
                errors.push(format!("Notional must not be negative, got {}", v));
                None
            }
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let spread = match parse_number("Spread", &self.spread) {
            Ok(v) if v < 0.0 => {
                errors.push(format!("Spread must not be negative, got {}", v));
                None
            }
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let frequency = if self.frequency.trim().is_empty() {
            Some(1)
        } else {
            self.frequency
                .trim()
                .parse::<i32>()
                .map_err(|_| errors.push(format!("Frequency must be an integer, got '{}'", self.frequency)))
                .ok()
        };

        let dates = match (parse_date(&self.start_date), parse_date(&self.maturity_date)) {
            (Ok(start), Ok(maturity)) if start >= maturity => {
                errors.push(format!(
                    "StartDate {} must be before MaturityDate {}",
                    start, maturity
                ));
                None
            }
            (Ok(start), Ok(maturity)) => Some((start, maturity)),
            (start, maturity) => {
                errors.extend(start.err());
                errors.extend(maturity.err());
                None
            }
        };

        match (side, rate_type, amortization, notional, spread, frequency, dates) {
            (
                Some(side),
                Some(rate_type),
                Some(amortization),
                Some(notional),
                Some(spread),
                Some(frequency),
                Some((start_date, maturity_date)),
            ) if errors.is_empty() => Ok(Contract::new(
                self.contract_id.trim(),
                self.product.trim(),
                side,
                notional,
                start_date,
                maturity_date,
                rate_type,
                amortization,
                spread,
            )
            .with_frequency(frequency)
            .with_curve(self.curve.trim())),
            _ => Err(errors),
        }
    }
}

/// Load all contracts from a CSV file
pub fn load_contracts<P: AsRef<Path>>(path: P) -> Result<Vec<Contract>, StorageError> {
    let reader = Reader::from_path(path)?;
    read_contracts(reader)
}

/// Load contracts from any reader (e.g., string buffer, network stream)
pub fn load_contracts_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Contract>, StorageError> {
    read_contracts(Reader::from_reader(reader))
}

fn read_contracts<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Contract>, StorageError> {
    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        return Err(StorageError::Validation(vec![format!(
            "missing required columns: {}",
            missing.join(", ")
        )]));
    }

    let mut contracts = Vec::new();
    let mut errors = Vec::new();

    // Row 1 is the header
    for (index, result) in reader.deserialize().enumerate() {
        let row_number = index + 2;
        let row: CsvRow = result?;
        let contract_id = row.contract_id.clone();

        match row.to_contract() {
            Ok(contract) => contracts.push(contract),
            Err(row_errors) => {
                for reason in row_errors {
                    errors.push(
                        StorageError::InvalidRecord {
                            row: row_number,
                            contract_id: contract_id.clone(),
                            reason,
                        }
                        .to_string(),
                    );
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(StorageError::Validation(errors));
    }

    log::debug!("loaded {} contracts", contracts.len());
    Ok(contracts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "ContractId,Product,Side,Notional,StartDate,MaturityDate,RateType,Amortization,Spread,Curve,Frequency\n";

    #[test]
    fn test_load_valid_file() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "C001,Loans and advances,ASSET,1000000,2023-01-01,2033-01-01,FIXED,GERMAN,0.05,BASE,1\n",
            "D001,Term deposits,liability,500000,2023-06-01,2024-06-01,floating,bullet,0.03,BASE,4\n",
        );
        let contracts = load_contracts_from_reader(data.as_bytes()).unwrap();

        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].contract_id, "C001");
        assert_eq!(contracts[0].amortization, AmortizationType::German);
        assert_eq!(contracts[1].side, Side::Liability);
        assert_eq!(contracts[1].rate_type, RateType::Floating);
        assert_eq!(contracts[1].frequency, 4);
        assert_eq!(contracts[1].curve_id, "BASE");
    }

    #[test]
    fn test_empty_frequency_defaults_to_annual() {
        let data = format!(
            "{}{}",
            HEADER, "C001,Loans,ASSET,100,2023-01-01,2024-01-01,FIXED,BULLET,0.01,BASE,\n"
        );
        let contracts = load_contracts_from_reader(data.as_bytes()).unwrap();
        assert_eq!(contracts[0].frequency, 1);
    }

    #[test]
    fn test_collects_all_row_errors() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "C001,Loans,EQUITY,-5,2023-01-01,2022-01-01,FIXED,GERMAN,0.05,BASE,1\n",
            "C002,Loans,ASSET,100,not-a-date,2024-01-01,SWAP,BALLOON,abc,BASE,1\n",
        );

        match load_contracts_from_reader(data.as_bytes()) {
            Err(StorageError::Validation(errors)) => {
                // Row 2: side, notional, dates; row 3: rate type, amortization, spread, date
                assert_eq!(errors.len(), 7, "{:?}", errors);
                assert!(errors[0].starts_with("row 2 (C001)"));
                assert!(errors.iter().any(|e| e.starts_with("row 3 (C002)") && e.contains("SWAP")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns() {
        let data = "ContractId,Product\nC001,Loans\n";
        match load_contracts_from_reader(data.as_bytes()) {
            Err(StorageError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("Notional"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
