//! Keeps the stacking order of partitions stable across years.

use std::collections::BTreeMap;

use crate::models::PartitionEntry;

/// Partitions of one category, per year. `None` marks a year without data.
pub type PartitionByYear = BTreeMap<i32, Option<Vec<PartitionEntry>>>;

/// Ids of the most recent present partition, largest amount first.
pub fn canonical_order(partitions: &PartitionByYear) -> Vec<String> {
    let Some(reference) = partitions.values().rev().find_map(|p| p.as_ref()) else {
        return Vec::new();
    };
    let mut sorted: Vec<&PartitionEntry> = reference.iter().collect();
    sorted.sort_by(|a, b| b.part_amount_cents.cmp(&a.part_amount_cents));
    sorted.into_iter().map(|p| p.content_id.clone()).collect()
}

/// Reorders one partition along `order`.
///
/// Ids missing from `order` come first, in their original relative order.
pub fn sort_along(partition: &mut [PartitionEntry], order: &[String]) {
    partition.sort_by_key(|p| order.iter().position(|id| *id == p.content_id));
}

/// Aligns every year on the order of the most recent year.
///
/// Only order changes; membership and amounts are untouched.
pub fn align_partitions(mut partitions: PartitionByYear) -> PartitionByYear {
    let order = canonical_order(&partitions);
    for partition in partitions.values_mut().flatten() {
        sort_along(partition, &order);
    }
    partitions
}
