use crate::cache::FinanceCache;
use crate::config::Config;
use crate::error::AppResult;
use crate::services::{Explorer, MergeRules};
use crate::store::{FunctionLabels, LedgerStore, TextsStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<LedgerStore>,
    pub texts: Arc<TextsStore>,
    pub function_labels: Arc<FunctionLabels>,
    pub merge_rules: Arc<MergeRules>,
    pub cache: Arc<FinanceCache>,
}

impl AppState {
    /// Loads ledger, texts and labels from the configured data directory.
    pub fn load(config: Config) -> AppResult<Self> {
        let ledger = LedgerStore::load_dir(&config.ledger_path())?;
        let texts = TextsStore::load(&config.texts_path())?;
        let function_labels = FunctionLabels::load(&config.function_labels_path())?;
        let merge_rules = MergeRules::load(&config.merge_rules_path())?;

        Ok(Self {
            config: Arc::new(config),
            ledger: Arc::new(ledger),
            texts: Arc::new(texts),
            function_labels: Arc::new(function_labels),
            merge_rules: Arc::new(merge_rules),
            cache: Arc::new(FinanceCache::new()),
        })
    }

    pub fn explorer(&self) -> Explorer<'_> {
        Explorer::new(
            self.ledger.as_ref(),
            self.texts.as_ref(),
            &self.function_labels,
            &self.cache,
            &self.merge_rules,
        )
    }

    /// Re-reads the ledger directory and drops cached trees of every year
    /// whose snapshot changed.
    pub fn reload_ledger(&self) -> AppResult<Vec<i32>> {
        let changed = self.ledger.reload_dir(&self.config.ledger_path())?;
        for year in &changed {
            self.cache.invalidate_year(*year);
        }
        Ok(changed)
    }
}
