//! Storage boundary: where contracts come from and where results go
//!
//! The engine only sees these two traits. File-backed implementations read
//! one contract CSV per portfolio and write one JSON document per result;
//! the in-memory ones back tests and embedding.

use super::result::BalanceResult;
use crate::contract::{load_contracts, Contract};
use crate::error::StorageError;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Identifier assigned to a stored result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultId(pub String);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of a portfolio's contracts
pub trait ContractRepository: Send + Sync {
    fn load_contracts(&self, portfolio_id: &str) -> Result<Vec<Contract>, StorageError>;
}

/// Sink for finished results
pub trait ResultStore: Send + Sync {
    fn save_result(&self, result: &BalanceResult) -> Result<ResultId, StorageError>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    portfolios: HashMap<String, Vec<Contract>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, portfolio_id: impl Into<String>, contracts: Vec<Contract>) {
        self.portfolios.insert(portfolio_id.into(), contracts);
    }

    pub fn with_portfolio(mut self, portfolio_id: impl Into<String>, contracts: Vec<Contract>) -> Self {
        self.insert(portfolio_id, contracts);
        self
    }
}

impl ContractRepository for InMemoryRepository {
    fn load_contracts(&self, portfolio_id: &str) -> Result<Vec<Contract>, StorageError> {
        self.portfolios
            .get(portfolio_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("portfolio '{}'", portfolio_id)))
    }
}

/// Keeps every saved result; ids are 1-based positions
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: Mutex<Vec<BalanceResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all saved results, oldest first
    pub fn results(&self) -> Vec<BalanceResult> {
        match self.results.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for InMemoryResultStore {
    fn save_result(&self, result: &BalanceResult) -> Result<ResultId, StorageError> {
        let mut guard = match self.results.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(result.clone());
        Ok(ResultId(guard.len().to_string()))
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// Reads `<root>/<portfolio_id>.csv`
#[derive(Debug, Clone)]
pub struct CsvContractRepository {
    root: PathBuf,
}

impl CsvContractRepository {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, portfolio_id: &str) -> PathBuf {
        self.root.join(format!("{}.csv", portfolio_id))
    }
}

impl ContractRepository for CsvContractRepository {
    fn load_contracts(&self, portfolio_id: &str) -> Result<Vec<Contract>, StorageError> {
        let path = self.path_for(portfolio_id);
        if !path.is_file() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        log::debug!("loading contracts from {}", path.display());
        load_contracts(&path)
    }
}

/// Writes one pretty-printed JSON document per result
///
/// Files are written to a temporary name and renamed into place, so a
/// reader never sees a partial document.
#[derive(Debug, Clone)]
pub struct JsonResultStore {
    dir: PathBuf,
}

impl JsonResultStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(result: &BalanceResult) -> String {
        let portfolio = result.portfolio_id.as_deref().unwrap_or("portfolio");
        let safe: String = portfolio
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!(
            "{}_{}_{}",
            safe,
            result.valuation_date.format("%Y%m%d"),
            result.calculated_at.format("%Y%m%dT%H%M%S%.6fZ")
        )
    }

    /// Load a stored result back by id
    pub fn load(&self, id: &ResultId) -> Result<BalanceResult, StorageError> {
        let path = self.dir.join(format!("{}.json", id));
        if !path.is_file() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl ResultStore for JsonResultStore {
    fn save_result(&self, result: &BalanceResult) -> Result<ResultId, StorageError> {
        fs::create_dir_all(&self.dir)?;

        let stem = Self::file_stem(result);
        let target = self.dir.join(format!("{}.json", stem));
        let tmp = self.dir.join(format!(".{}.json.tmp", stem));

        let json = serde_json::to_string_pretty(result)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;

        log::info!("saved result to {}", target.display());
        Ok(ResultId(stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShockConfig;
    use crate::contract::{AmortizationType, RateType, Side};
    use crate::curve::build_default_curve_family;
    use crate::portfolio::run_portfolio;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("irrbb_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn contract() -> Contract {
        Contract::new(
            "C1",
            "Loans",
            Side::Asset,
            1_000.0,
            date(2024, 1, 1),
            date(2026, 1, 1),
            RateType::Fixed,
            AmortizationType::Bullet,
            0.04,
        )
    }

    fn result() -> BalanceResult {
        let family = build_default_curve_family(&ShockConfig::default()).unwrap();
        run_portfolio(&[contract()], &family, date(2024, 1, 1), false).with_portfolio_id("book/A")
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryRepository::new().with_portfolio("A", vec![contract()]);
        assert_eq!(repo.load_contracts("A").unwrap().len(), 1);
        assert!(matches!(repo.load_contracts("B"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_in_memory_store_ids() {
        let store = InMemoryResultStore::new();
        assert!(store.is_empty());
        assert_eq!(store.save_result(&result()).unwrap(), ResultId("1".into()));
        assert_eq!(store.save_result(&result()).unwrap().to_string(), "2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_csv_repository() {
        let dir = scratch_dir("csv_repo");
        fs::write(
            dir.join("BOOK1.csv"),
            "ContractId,Product,Side,Notional,StartDate,MaturityDate,RateType,Amortization,Spread,Curve,Frequency\n\
             C1,Loans,ASSET,1000,2024-01-01,2026-01-01,FIXED,BULLET,0.04,BASE,1\n",
        )
        .unwrap();

        let repo = CsvContractRepository::new(&dir);
        let contracts = repo.load_contracts("BOOK1").unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].contract_id, "C1");
        assert_eq!(contracts[0].maturity_date, date(2026, 1, 1));
        assert!(matches!(repo.load_contracts("MISSING"), Err(StorageError::NotFound(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = scratch_dir("json_store");
        let store = JsonResultStore::new(dir.join("results"));
        let saved = result();

        let id = store.save_result(&saved).unwrap();
        assert!(id.0.starts_with("book_A_20240101_"));
        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded.portfolio_id, saved.portfolio_id);
        assert_eq!(loaded.calculated_at, saved.calculated_at);
        assert_eq!(loaded.metadata.contracts, 1);
        assert!((loaded.eve_base - saved.eve_base).abs() < 1e-6);

        // No temporary files left behind
        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.json", id)]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
