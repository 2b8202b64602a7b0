use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::LedgerRow;

/// Position of a node inside its [`CategoryTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A budget category with its aggregated total.
///
/// Branches carry `children` and no rows; leaves carry the ledger rows that
/// contributed to them.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub id: String,
    pub total_cents: i64,
    pub children: Vec<NodeId>,
    pub rows: Vec<LedgerRow>,
}

impl CategoryNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed category forest for one year.
///
/// Nodes are only reachable through the tree that built them; parent links
/// are never stored on nodes (see [`crate::services::ancestors`]).
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
    roots: Vec<NodeId>,
}

impl CategoryTree {
    pub fn node(&self, id: NodeId) -> &CategoryNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&CategoryNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First root; detail hierarchies have exactly one.
    pub fn root(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &CategoryNode)> + '_ {
        self.node(id)
            .children
            .iter()
            .map(move |&child| (child, self.node(child)))
    }
}

/// Bottom-up constructor for [`CategoryTree`].
///
/// Children must be pushed before their parent. A branch's total is always
/// the sum of its children's totals, a leaf's is the sum of its rows, so the
/// sum invariant holds by construction. A total that does not fit in `i64`
/// makes [`TreeBuilder::finish`] fail.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<CategoryNode>,
    overflowed: Option<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, id: impl Into<String>, rows: Vec<LedgerRow>) -> NodeId {
        let id = id.into();
        let total_cents = self.checked_total(&id, rows.iter().map(|r| r.amount_cents));
        self.push(CategoryNode {
            id,
            total_cents,
            children: Vec::new(),
            rows,
        })
    }

    pub fn branch(&mut self, id: impl Into<String>, children: Vec<NodeId>) -> NodeId {
        let id = id.into();
        let totals: Vec<i64> = children
            .iter()
            .map(|c| self.nodes[c.0].total_cents)
            .collect();
        let total_cents = self.checked_total(&id, totals);
        self.push(CategoryNode {
            id,
            total_cents,
            children,
            rows: Vec::new(),
        })
    }

    fn checked_total(&mut self, id: &str, amounts: impl IntoIterator<Item = i64>) -> i64 {
        match amounts.into_iter().try_fold(0i64, i64::checked_add) {
            Some(total) => total,
            None => {
                if self.overflowed.is_none() {
                    self.overflowed = Some(id.to_string());
                }
                0
            }
        }
    }

    fn push(&mut self, node: CategoryNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn finish(self, roots: Vec<NodeId>) -> AppResult<CategoryTree> {
        if let Some(id) = self.overflowed {
            return Err(AppError::Validation(format!(
                "Total of category '{}' is out of range",
                id
            )));
        }
        Ok(CategoryTree {
            nodes: self.nodes,
            roots,
        })
    }
}
