//! Child → parent lookup built beside the trees, never stored on nodes.

use serde::Serialize;
use tracing::debug;

use crate::models::{CategoryTree, NodeId};
use crate::services::aggregation::{EXPENDITURES, REVENUE};
use crate::services::element_index::{ElementIndex, NodeRef, TreeSource};
use crate::services::flatten::flatten_tree;

/// Parent index per arena slot of one tree.
#[derive(Debug, Clone, Default)]
pub struct ParentRelation {
    parents: Vec<Option<NodeId>>,
}

impl ParentRelation {
    /// One pre-order pass recording each child's parent.
    pub fn build(tree: &CategoryTree) -> Self {
        let mut parents = vec![None; tree.len()];
        for (id, node) in flatten_tree(tree) {
            for child in &node.children {
                parents[child.index()] = Some(id);
            }
        }
        Self { parents }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(node.index()).copied().flatten()
    }
}

/// Expenditure or revenue side of the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Domain {
    Expenditures,
    Revenue,
}

impl Domain {
    pub fn root_id(&self) -> &'static str {
        match self {
            Self::Expenditures => EXPENDITURES,
            Self::Revenue => REVENUE,
        }
    }
}

/// Best-effort classification of a category id by its prefix.
///
/// Only `D…`/`M52-D…` and `R…`/`M52-R…` are recognised; other ids are left
/// unclassified.
pub fn classify_category_id(id: &str) -> Option<Domain> {
    if id.starts_with('D') || id.starts_with("M52-D") {
        Some(Domain::Expenditures)
    } else if id.starts_with('R') || id.starts_with("M52-R") {
        Some(Domain::Revenue)
    } else {
        debug!(id, "Category id matches no domain prefix");
        None
    }
}

/// Parent and top-level context queries over one year's [`ElementIndex`].
pub struct AncestorResolver<'a> {
    index: &'a ElementIndex,
    aggregated: ParentRelation,
    detail: Option<ParentRelation>,
}

impl<'a> AncestorResolver<'a> {
    pub fn new(index: &'a ElementIndex) -> Self {
        Self {
            index,
            aggregated: ParentRelation::build(index.aggregated()),
            detail: index.detail().map(ParentRelation::build),
        }
    }

    pub fn parent(&self, r: NodeRef) -> Option<NodeRef> {
        let relation = match r.source {
            TreeSource::Aggregated => Some(&self.aggregated),
            TreeSource::Detail => self.detail.as_ref(),
        };
        relation?.parent(r.node).map(|node| NodeRef {
            source: r.source,
            node,
        })
    }

    pub fn is_top_level_or_domain_root(&self, r: NodeRef) -> bool {
        self.index
            .node(r)
            .is_some_and(|n| n.id == EXPENDITURES || n.id == REVENUE)
    }

    /// True unless the node is a domain root or sits directly under the
    /// detail tree's root.
    pub fn is_deep(&self, r: NodeRef) -> bool {
        if self.is_top_level_or_domain_root(r) {
            return false;
        }
        let detail_root = self.index.detail().and_then(|d| d.root()).map(|node| NodeRef {
            source: TreeSource::Detail,
            node,
        });
        match (self.parent(r), detail_root) {
            (Some(parent), Some(root)) => parent != root,
            _ => true,
        }
    }

    pub fn parent_context(&self, r: NodeRef) -> Option<NodeRef> {
        if !self.is_deep(r) {
            return None;
        }
        self.parent(r)
    }

    pub fn top_context(&self, r: NodeRef) -> Option<NodeRef> {
        if !self.is_deep(r) {
            return None;
        }
        let domain = classify_category_id(&self.index.node(r)?.id)?;
        self.index.resolve(domain.root_id())
    }
}
