//! Chart-only merges of sibling partition entries.
//!
//! Some sibling categories are shown as a single brick in the multi-year
//! chart. The drill-down list always keeps the disaggregated partition.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::AppResult;
use crate::models::{PartitionEntry, TextsRecord};
use crate::services::alignment::PartitionByYear;

/// Merge of `absorbed_id` into `kept_id` within the partition of `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    pub parent_id: String,
    pub absorbed_id: String,
    pub kept_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRules(Vec<MergeRule>);

impl Default for MergeRules {
    /// DF-1 and DF-2 describe the same social-action spending from two
    /// angles; the chart shows it once.
    fn default() -> Self {
        Self(vec![MergeRule {
            parent_id: "DF".into(),
            absorbed_id: "DF-1".into(),
            kept_id: "DF-2".into(),
            label: "Actions sociales par publics".into(),
        }])
    }
}

impl MergeRules {
    pub fn new(rules: Vec<MergeRule>) -> Self {
        Self(rules)
    }

    /// Loads a JSON array of rules, or the default table when the file does
    /// not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let rules: Vec<MergeRule> = serde_json::from_str(&content)?;
                debug!(count = rules.len(), path = %path.display(), "Loaded merge rules");
                Ok(Self::new(rules))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn rules_for<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a MergeRule> {
        self.0.iter().filter(move |r| r.parent_id == parent_id)
    }

    /// Chart view of one partition of `parent_id`.
    pub fn apply(&self, parent_id: &str, partition: &[PartitionEntry]) -> Vec<PartitionEntry> {
        let mut chart = partition.to_vec();
        for rule in self.rules_for(parent_id) {
            rule.apply(&mut chart);
        }
        chart
    }

    /// Chart view of every year's partition of `parent_id`.
    pub fn apply_by_year(&self, parent_id: &str, partitions: &PartitionByYear) -> PartitionByYear {
        partitions
            .iter()
            .map(|(year, partition)| {
                (
                    *year,
                    partition.as_ref().map(|p| self.apply(parent_id, p)),
                )
            })
            .collect()
    }
}

impl MergeRule {
    fn apply(&self, partition: &mut Vec<PartitionEntry>) {
        if let Some(pos) = partition.iter().position(|p| p.content_id == self.absorbed_id) {
            partition.remove(pos);
        }

        if let Some(kept) = partition.iter_mut().find(|p| p.content_id == self.kept_id) {
            let mut texts = kept.texts.take().unwrap_or_default();
            texts.label = self.label.clone();
            kept.texts = Some(texts);
            trace!(
                parent = %self.parent_id,
                absorbed = %self.absorbed_id,
                kept = %self.kept_id,
                "Merged chart partition entries"
            );
        }
    }
}
