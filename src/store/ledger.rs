use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{LedgerRow, LedgerSnapshot};
use crate::services::ledger_csv::parse_ledger_csv;

/// Where per-year ledger rows come from.
pub trait LedgerSource {
    /// Every year with a snapshot, ascending.
    fn years(&self) -> Vec<i32>;

    fn rows_for_year(&self, year: i32) -> Option<Arc<LedgerSnapshot>>;
}

/// In-memory ledger keyed by year.
#[derive(Debug, Default)]
pub struct LedgerStore {
    snapshots: RwLock<BTreeMap<i32, Arc<LedgerSnapshot>>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `<year>.csv` file of `dir`.
    pub fn load_dir(dir: &Path) -> AppResult<Self> {
        let store = Self::new();
        store.reload_dir(dir)?;
        Ok(store)
    }

    /// Replaces the store contents with the files of `dir`; returns the
    /// years whose snapshot changed (added, replaced or removed).
    pub fn reload_dir(&self, dir: &Path) -> AppResult<Vec<i32>> {
        let loaded = read_ledger_dir(dir)?;

        let mut guard = self
            .snapshots
            .write()
            .map_err(|_| AppError::Internal("Ledger store lock poisoned".into()))?;

        let mut changed: Vec<i32> = guard
            .keys()
            .filter(|year| !loaded.contains_key(*year))
            .copied()
            .collect();
        changed.extend(loaded.keys().copied());
        changed.sort_unstable();
        changed.dedup();

        *guard = loaded
            .into_iter()
            .map(|(year, rows)| (year, Arc::new(LedgerSnapshot::new(year, rows))))
            .collect();

        info!(years = guard.len(), dir = %dir.display(), "Loaded ledger data");
        Ok(changed)
    }

    /// Swaps in a new snapshot for `year`.
    pub fn replace_year(&self, year: i32, rows: Vec<LedgerRow>) -> Arc<LedgerSnapshot> {
        let snapshot = Arc::new(LedgerSnapshot::new(year, rows));
        if let Ok(mut guard) = self.snapshots.write() {
            guard.insert(year, snapshot.clone());
        }
        debug!(year, revision = snapshot.revision(), "Replaced ledger snapshot");
        snapshot
    }
}

impl LedgerSource for LedgerStore {
    fn years(&self) -> Vec<i32> {
        self.snapshots
            .read()
            .map(|g| g.keys().copied().collect())
            .unwrap_or_default()
    }

    fn rows_for_year(&self, year: i32) -> Option<Arc<LedgerSnapshot>> {
        self.snapshots.read().ok()?.get(&year).cloned()
    }
}

fn read_ledger_dir(dir: &Path) -> AppResult<BTreeMap<i32, Vec<LedgerRow>>> {
    let file_name = Regex::new(r"^(\d{4})\.csv$")
        .map_err(|e| AppError::Internal(format!("Invalid ledger file pattern: {}", e)))?;

    let mut years = BTreeMap::new();
    if !dir.exists() {
        warn!(dir = %dir.display(), "Ledger directory not found, no data loaded");
        return Ok(years);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(year) = file_name
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
        else {
            debug!(file = %name, "Ignoring non-ledger file");
            continue;
        };

        let content = fs::read(&path)?;
        let parsed = parse_ledger_csv(&content)?;
        for error in &parsed.errors {
            warn!(year, "{}", error);
        }
        years.insert(year, parsed.rows);
    }

    Ok(years)
}
