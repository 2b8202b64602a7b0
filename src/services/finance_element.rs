//! Everything the finance-detail page needs for one category and year.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::FinanceCache;
use crate::models::{ContextSummary, LedgerRowView, PartitionEntry, Rdfi, TextsRecord};
use crate::services::alignment::{align_partitions, PartitionByYear};
use crate::services::ancestors::{classify_category_id, AncestorResolver, Domain};
use crate::services::detail::rdfi_of_detail_id;
use crate::services::element_index::{ElementIndex, NodeRef};
use crate::services::merge::MergeRules;
use crate::services::partition::{finance_details_url, project_partition, TextsLookup};
use crate::store::{FunctionLabels, LedgerSource};

#[derive(Debug, Clone, Serialize)]
pub struct FinanceElementView {
    pub content_id: String,
    pub year: i32,
    pub rdfi: Option<Rdfi>,
    pub label: String,
    pub texts: Option<TextsRecord>,
    pub expense_or_revenue: Option<Domain>,
    pub amount_cents: Option<i64>,
    pub amount_by_year: BTreeMap<i32, Option<i64>>,
    /// Aligned, disaggregated partitions (drill-down source).
    pub partition_by_year: PartitionByYear,
    /// Aligned partitions with chart merges applied.
    pub chart_partition_by_year: PartitionByYear,
    pub year_partition: Option<Vec<PartitionEntry>>,
    pub is_leaf: bool,
    pub parent: Option<ContextSummary>,
    pub top: Option<ContextSummary>,
    pub ledger_rows: Option<Vec<LedgerRowView>>,
}

pub struct Explorer<'a> {
    ledger: &'a dyn LedgerSource,
    texts: &'a dyn TextsLookup,
    function_labels: &'a FunctionLabels,
    cache: &'a FinanceCache,
    merge_rules: &'a MergeRules,
}

impl<'a> Explorer<'a> {
    pub fn new(
        ledger: &'a dyn LedgerSource,
        texts: &'a dyn TextsLookup,
        function_labels: &'a FunctionLabels,
        cache: &'a FinanceCache,
        merge_rules: &'a MergeRules,
    ) -> Self {
        Self {
            ledger,
            texts,
            function_labels,
            cache,
            merge_rules,
        }
    }

    /// Index of `year`, with the detail tree of `rdfi` when given.
    pub fn index_for(&self, year: i32, rdfi: Option<Rdfi>) -> Option<Arc<ElementIndex>> {
        let snapshot = self.ledger.rows_for_year(year)?;
        self.cache.element_index(&snapshot, rdfi)
    }

    pub fn amount_by_year(&self, category_id: &str) -> BTreeMap<i32, Option<i64>> {
        let rdfi = rdfi_of_detail_id(category_id);
        self.ledger
            .years()
            .into_iter()
            .map(|year| {
                let amount = self
                    .index_for(year, rdfi)
                    .and_then(|index| index.total_of(category_id));
                (year, amount)
            })
            .collect()
    }

    /// Unaligned partitions of `category_id` for every known year.
    pub fn partition_by_year(&self, category_id: &str) -> PartitionByYear {
        let rdfi = rdfi_of_detail_id(category_id);
        self.ledger
            .years()
            .into_iter()
            .map(|year| {
                let partition = self
                    .index_for(year, rdfi)
                    .and_then(|index| project_partition(category_id, &index, self.texts));
                (year, partition)
            })
            .collect()
    }

    /// Assembles the view of `category_id` at `year`.
    ///
    /// `None` when the id exists in no year of the ledger.
    pub fn element(&self, category_id: &str, year: i32) -> Option<FinanceElementView> {
        let rdfi = rdfi_of_detail_id(category_id);

        let amount_by_year = self.amount_by_year(category_id);
        if amount_by_year.values().all(Option::is_none) {
            debug!(id = category_id, "Category found in no ledger year");
            return None;
        }

        let partition_by_year = align_partitions(self.partition_by_year(category_id));
        let chart_partition_by_year = self
            .merge_rules
            .apply_by_year(category_id, &partition_by_year);
        let year_partition = partition_by_year.get(&year).cloned().flatten();
        let is_leaf = year_partition.as_ref().map_or(true, |p| p.len() < 2);

        let texts = self.texts.texts_for(category_id).cloned();
        let label = texts
            .as_ref()
            .map(|t| t.label.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| category_id.to_string());

        let mut view = FinanceElementView {
            content_id: category_id.to_string(),
            year,
            rdfi,
            label,
            texts,
            expense_or_revenue: None,
            amount_cents: amount_by_year.get(&year).copied().flatten(),
            amount_by_year,
            partition_by_year,
            chart_partition_by_year,
            year_partition,
            is_leaf,
            parent: None,
            top: None,
            ledger_rows: None,
        };

        let Some(index) = self.index_for(year, rdfi) else {
            return Some(view);
        };
        let Some(element) = index.resolve(category_id) else {
            return Some(view);
        };

        view.expense_or_revenue = classify_category_id(category_id);

        let resolver = AncestorResolver::new(&index);
        let parent = resolver.parent_context(element);
        let top = resolver.top_context(element);
        view.parent = parent
            .filter(|p| Some(*p) != top)
            .and_then(|p| self.summary(&index, p));
        view.top = top.and_then(|t| self.summary(&index, t));

        let Some(node) = index.node(element) else {
            return Some(view);
        };
        if node.is_leaf() {
            let mut rows: Vec<LedgerRowView> = node
                .rows
                .iter()
                .map(|row| LedgerRowView::new(row, self.function_labels.get(&row.function_code)))
                .collect();
            rows.sort_by(|a, b| b.amount_cents.cmp(&a.amount_cents));
            view.ledger_rows = Some(rows);
        }

        Some(view)
    }

    fn summary(&self, index: &ElementIndex, r: NodeRef) -> Option<ContextSummary> {
        let node = index.node(r)?;
        let label = self
            .texts
            .texts_for(&node.id)
            .map(|t| t.label.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| node.id.clone());
        Some(ContextSummary {
            id: node.id.clone(),
            amount_cents: node.total_cents,
            label,
            url: finance_details_url(&node.id),
        })
    }
}
