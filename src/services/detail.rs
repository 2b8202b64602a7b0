//! Fine-grained ("M52") hierarchy for one direction × section pair.
//!
//! Every prefix of a row's function code becomes a category
//! (`M52-DF-5`, `M52-DF-52`, ...) and the row itself lands in a nature leaf
//! under its full function code (`M52-DF-52-6568`).

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::AppResult;
use crate::models::{CategoryTree, LedgerRow, NodeId, Rdfi, TreeBuilder};

/// Prefix shared by every id of the detail hierarchy.
pub const DETAIL_PREFIX: &str = "M52-";

pub fn detail_root_id(rdfi: Rdfi) -> String {
    format!("{}{}", DETAIL_PREFIX, rdfi)
}

pub fn detail_function_id(rdfi: Rdfi, function_code: &str) -> String {
    format!("{}{}-{}", DETAIL_PREFIX, rdfi, function_code)
}

pub fn detail_nature_id(rdfi: Rdfi, function_code: &str, nature_code: &str) -> String {
    format!("{}{}-{}-{}", DETAIL_PREFIX, rdfi, function_code, nature_code)
}

/// Reads the selector out of a detail id: `M52-DF-52` → `DF`.
pub fn rdfi_of_detail_id(id: &str) -> Option<Rdfi> {
    let rest = id.strip_prefix(DETAIL_PREFIX)?;
    Rdfi::parse(rest.get(..2)?)
}

/// Builds the detail hierarchy of `rdfi` for one year.
///
/// Returns `None` when no row belongs to the selector.
pub fn build_detail_tree(rows: &[LedgerRow], rdfi: Rdfi) -> AppResult<Option<CategoryTree>> {
    let mut by_domain: BTreeMap<char, Vec<LedgerRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.rdfi() == rdfi) {
        if let Some(first) = row.function_code.chars().next() {
            by_domain.entry(first).or_default().push(row.clone());
        }
    }

    if by_domain.is_empty() {
        return Ok(None);
    }

    let mut builder = TreeBuilder::new();
    let children: Vec<NodeId> = by_domain
        .into_iter()
        .map(|(first, rows)| build_function(&mut builder, rdfi, first.to_string(), rows))
        .collect();
    let root = builder.branch(detail_root_id(rdfi), children);

    let tree = builder.finish(vec![root])?;
    debug!(rdfi = %rdfi, nodes = tree.len(), "Built detail tree");
    Ok(Some(tree))
}

/// `rows` all have a function code starting with `prefix`.
fn build_function(
    builder: &mut TreeBuilder,
    rdfi: Rdfi,
    prefix: String,
    rows: Vec<LedgerRow>,
) -> NodeId {
    let mut natures: BTreeMap<String, Vec<LedgerRow>> = BTreeMap::new();
    let mut deeper: BTreeMap<char, Vec<LedgerRow>> = BTreeMap::new();

    for row in rows {
        match row.function_code[prefix.len()..].chars().next() {
            None => natures.entry(row.nature_code.clone()).or_default().push(row),
            Some(next) => deeper.entry(next).or_default().push(row),
        }
    }

    let mut children: Vec<NodeId> = natures
        .into_iter()
        .map(|(nature, rows)| builder.leaf(detail_nature_id(rdfi, &prefix, &nature), rows))
        .collect();

    for (next, rows) in deeper {
        let sub_prefix = format!("{}{}", prefix, next);
        children.push(build_function(builder, rdfi, sub_prefix, rows));
    }

    builder.branch(detail_function_id(rdfi, &prefix), children)
}
