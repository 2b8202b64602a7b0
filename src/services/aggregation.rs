//! Coarse "aggregated" category tree: domain → section → functional domain.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::AppResult;
use crate::models::{CategoryTree, Direction, LedgerRow, NodeId, Rdfi, Section, TreeBuilder};

/// Id of the expenditures domain root.
pub const EXPENDITURES: &str = "D";
/// Id of the revenue domain root.
pub const REVENUE: &str = "R";

pub fn domain_root_id(direction: Direction) -> &'static str {
    match direction {
        Direction::Expenditure => EXPENDITURES,
        Direction::Revenue => REVENUE,
    }
}

/// Id of the functional-domain category, e.g. `DF-5`.
pub fn functional_domain_id(rdfi: Rdfi, domain: char) -> String {
    format!("{}-{}", rdfi, domain)
}

/// Builds the aggregated forest (`D` and `R` roots) for one year.
///
/// Returns `None` when there are no rows: a year without data has no tree.
/// Fails when a category total does not fit in `i64` cents.
pub fn build_aggregated_tree(rows: &[LedgerRow]) -> AppResult<Option<CategoryTree>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut grouped: BTreeMap<(Direction, Section), BTreeMap<char, Vec<LedgerRow>>> =
        BTreeMap::new();
    for row in rows {
        let Some(domain) = row.function_code.chars().next() else {
            debug!(label = %row.label, "Skipping ledger row without function code");
            continue;
        };
        grouped
            .entry((row.direction, row.section))
            .or_default()
            .entry(domain)
            .or_default()
            .push(row.clone());
    }

    let mut builder = TreeBuilder::new();
    let mut roots = Vec::new();

    for direction in [Direction::Expenditure, Direction::Revenue] {
        let mut sections: Vec<NodeId> = Vec::new();
        for section in [Section::Operating, Section::Investment] {
            let Some(domains) = grouped.remove(&(direction, section)) else {
                continue;
            };
            let rdfi = Rdfi::new(direction, section);
            let leaves: Vec<NodeId> = domains
                .into_iter()
                .map(|(domain, rows)| builder.leaf(functional_domain_id(rdfi, domain), rows))
                .collect();
            trace!(rdfi = %rdfi, domains = leaves.len(), "Aggregated section");
            sections.push(builder.branch(rdfi.to_string(), leaves));
        }
        if !sections.is_empty() {
            roots.push(builder.branch(domain_root_id(direction), sections));
        }
    }

    if roots.is_empty() {
        return Ok(None);
    }

    let tree = builder.finish(roots)?;
    debug!(nodes = tree.len(), rows = rows.len(), "Built aggregated tree");
    Ok(Some(tree))
}
