//! Id → node lookup over one year's aggregated and detail trees.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::models::{CategoryNode, CategoryTree, NodeId};
use crate::services::flatten::flatten_tree;

/// Which of the two trees a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TreeSource {
    Aggregated,
    Detail,
}

/// Identity of a node within an [`ElementIndex`].
///
/// Only meaningful for the index that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeRef {
    pub(crate) source: TreeSource,
    pub(crate) node: NodeId,
}

/// Mapping from category id to node for exactly one year.
///
/// The aggregated tree is indexed first, the detail tree second; on an id
/// collision the detail node wins.
#[derive(Debug, Clone)]
pub struct ElementIndex {
    aggregated: Arc<CategoryTree>,
    detail: Option<Arc<CategoryTree>>,
    by_id: HashMap<String, NodeRef>,
}

impl ElementIndex {
    pub fn build(aggregated: Arc<CategoryTree>, detail: Option<Arc<CategoryTree>>) -> Self {
        let mut by_id = HashMap::new();

        for (node, n) in flatten_tree(&aggregated) {
            by_id.insert(
                n.id.clone(),
                NodeRef {
                    source: TreeSource::Aggregated,
                    node,
                },
            );
        }

        if let Some(detail) = &detail {
            for (node, n) in flatten_tree(detail) {
                let previous = by_id.insert(
                    n.id.clone(),
                    NodeRef {
                        source: TreeSource::Detail,
                        node,
                    },
                );
                if previous.is_some() {
                    trace!(id = %n.id, "Detail node overrides aggregated node");
                }
            }
        }

        Self {
            aggregated,
            detail,
            by_id,
        }
    }

    pub fn resolve(&self, id: &str) -> Option<NodeRef> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.resolve(id).and_then(|r| self.node(r))
    }

    pub fn aggregated(&self) -> &CategoryTree {
        &self.aggregated
    }

    pub fn detail(&self) -> Option<&CategoryTree> {
        self.detail.as_deref()
    }

    /// Node behind `r`; `None` when `r` does not belong to this index.
    pub fn node(&self, r: NodeRef) -> Option<&CategoryNode> {
        match r.source {
            TreeSource::Aggregated => self.aggregated.get(r.node),
            TreeSource::Detail => self.detail.as_ref()?.get(r.node),
        }
    }

    pub fn children(&self, r: NodeRef) -> impl Iterator<Item = (NodeRef, &CategoryNode)> + '_ {
        self.node(r)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(move |&node| {
                let child = NodeRef {
                    source: r.source,
                    node,
                };
                self.node(child).map(|n| (child, n))
            })
    }

    /// Totals by id, as seen through the override rule.
    pub fn total_of(&self, id: &str) -> Option<i64> {
        self.get(id).map(|n| n.total_cents)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
