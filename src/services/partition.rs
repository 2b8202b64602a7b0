//! Child breakdown of one category for one year.

use crate::models::{CategoryNode, PartitionEntry, TextsRecord};
use crate::services::element_index::ElementIndex;

/// Source of editorial texts, keyed by category id.
pub trait TextsLookup {
    fn texts_for(&self, id: &str) -> Option<&TextsRecord>;
}

impl TextsLookup for std::collections::HashMap<String, TextsRecord> {
    fn texts_for(&self, id: &str) -> Option<&TextsRecord> {
        self.get(id)
    }
}

/// Drill-down link of a category.
pub fn finance_details_url(id: &str) -> String {
    format!("#!/finance-details/{}", id)
}

fn entry_for(node: &CategoryNode, texts: &dyn TextsLookup) -> PartitionEntry {
    PartitionEntry {
        content_id: node.id.clone(),
        part_amount_cents: node.total_cents,
        texts: texts.texts_for(&node.id).cloned(),
        url: finance_details_url(&node.id),
    }
}

/// Projects the breakdown of `category_id`.
///
/// One entry per child in tree order; a childless category yields a single
/// entry describing itself. `None` when the id is not in the index.
pub fn project_partition(
    category_id: &str,
    index: &ElementIndex,
    texts: &dyn TextsLookup,
) -> Option<Vec<PartitionEntry>> {
    let r = index.resolve(category_id)?;
    let node = index.node(r)?;

    if node.is_leaf() {
        return Some(vec![entry_for(node, texts)]);
    }

    Some(
        index
            .children(r)
            .map(|(_, child)| entry_for(child, texts))
            .collect(),
    )
}
