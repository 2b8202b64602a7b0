//! Integration tests for the finance element view across years.

mod common;

use budget_explorer::models::Rdfi;
use budget_explorer::services::ancestors::Domain;
use budget_explorer::services::flatten::flatten_tree;
use budget_explorer::services::PartitionByYear;
use budget_explorer::store::LedgerSource;
use common::Fixture;

fn ids(partitions: &PartitionByYear, year: i32) -> Vec<String> {
    partitions[&year]
        .as_ref()
        .map(|p| p.iter().map(|e| e.content_id.clone()).collect())
        .unwrap_or_default()
}

/// Every branch of every tree equals the sum of its children, every year.
#[test]
fn test_sum_invariant_all_years() {
    let fixture = Fixture::new();
    let explorer = fixture.explorer();

    for year in fixture.ledger.years() {
        for rdfi in [Rdfi::DF, Rdfi::DI, Rdfi::RF, Rdfi::RI] {
            let Some(index) = explorer.index_for(year, Some(rdfi)) else {
                continue;
            };
            for tree in [Some(index.aggregated()), index.detail()].into_iter().flatten() {
                for (id, node) in flatten_tree(tree) {
                    if node.is_leaf() {
                        continue;
                    }
                    let sum: i64 = tree.children(id).map(|(_, c)| c.total_cents).sum();
                    assert_eq!(node.total_cents, sum, "{} in {}", node.id, year);
                }
            }
        }
    }
}

/// Amounts per year, absent where the year has no data for the category.
#[test]
fn test_amount_by_year() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF", 2017).unwrap();

    assert_eq!(view.amount_by_year[&2017], Some(1_630));
    assert_eq!(view.amount_by_year[&2016], Some(1_480));
    assert_eq!(view.amount_by_year[&2015], None);
    assert_eq!(view.amount_by_year[&2014], None);
    assert_eq!(view.amount_cents, Some(1_630));
}

/// A year without ledger rows is absent for every category.
#[test]
fn test_absence_propagation() {
    let fixture = Fixture::new();
    let explorer = fixture.explorer();

    for id in ["D", "DF", "DF-5", "RF", "M52-DF-52"] {
        let view = explorer.element(id, 2014).unwrap();
        assert_eq!(view.amount_by_year[&2014], None, "{}", id);
        assert!(view.partition_by_year[&2014].is_none(), "{}", id);
        assert!(view.amount_cents.is_none());
        assert!(view.year_partition.is_none());
        assert!(view.parent.is_none());
        assert!(view.top.is_none());
    }
}

/// Unknown ids yield no view at all.
#[test]
fn test_unknown_category() {
    let fixture = Fixture::new();
    assert!(fixture.explorer().element("DF-9", 2017).is_none());
    assert!(fixture.explorer().element("nonsense", 2017).is_none());
}

/// Partitions follow the most recent year's largest-first order.
#[test]
fn test_partitions_aligned_on_latest_year() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF", 2016).unwrap();

    assert_eq!(
        ids(&view.partition_by_year, 2017),
        vec!["DF-5", "DF-1", "DF-2", "DF-6"]
    );
    // DF-4 only exists in 2016, so it comes first
    assert_eq!(
        ids(&view.partition_by_year, 2016),
        vec!["DF-4", "DF-5", "DF-1", "DF-2"]
    );
    assert!(view.partition_by_year[&2015].is_none());
}

/// Partition amounts add up to the category total.
#[test]
fn test_partition_totals() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF", 2017).unwrap();
    for (year, partition) in &view.partition_by_year {
        if let Some(partition) = partition {
            let sum: i64 = partition.iter().map(|p| p.part_amount_cents).sum();
            assert_eq!(Some(sum), view.amount_by_year[year]);
        }
    }
}

/// The merge only affects the chart view of DF.
#[test]
fn test_chart_merge_scope() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF", 2017).unwrap();

    assert_eq!(
        ids(&view.chart_partition_by_year, 2017),
        vec!["DF-5", "DF-2", "DF-6"]
    );
    let chart = view.chart_partition_by_year[&2017].as_ref().unwrap();
    assert_eq!(chart[1].label(), "Actions sociales par publics");
    assert_eq!(chart[1].part_amount_cents, 280);

    let drill_down = view.year_partition.as_ref().unwrap();
    let drill_ids: Vec<&str> = drill_down.iter().map(|p| p.content_id.as_str()).collect();
    assert_eq!(drill_ids, vec!["DF-5", "DF-1", "DF-2", "DF-6"]);
    assert_eq!(drill_down[2].label(), "Actions sociales");

    let other = fixture.explorer().element("D", 2017).unwrap();
    assert_eq!(other.chart_partition_by_year, other.partition_by_year);
}

/// Domain roots have no context; sections point at their domain.
#[test]
fn test_contexts() {
    let fixture = Fixture::new();
    let explorer = fixture.explorer();

    let d = explorer.element("D", 2017).unwrap();
    assert!(d.parent.is_none());
    assert!(d.top.is_none());
    assert_eq!(d.expense_or_revenue, Some(Domain::Expenditures));

    // parent of DF is D, which is also the top: only top is kept
    let df = explorer.element("DF", 2017).unwrap();
    assert!(df.parent.is_none());
    let top = df.top.unwrap();
    assert_eq!(top.id, "D");
    assert_eq!(top.amount_cents, 1_830);
    assert_eq!(top.label, "Dépenses");
    assert_eq!(top.url, "#!/finance-details/D");

    let df5 = explorer.element("DF-5", 2017).unwrap();
    let parent = df5.parent.unwrap();
    assert_eq!(parent.id, "DF");
    assert_eq!(parent.label, "Dépenses de fonctionnement");
    assert_eq!(df5.top.unwrap().id, "D");

    let rf0 = explorer.element("RF-0", 2017).unwrap();
    assert_eq!(rf0.top.unwrap().id, "R");
    assert_eq!(rf0.expense_or_revenue, Some(Domain::Revenue));
}

/// Detail categories resolve their context through the detail tree.
#[test]
fn test_detail_contexts() {
    let fixture = Fixture::new();
    let explorer = fixture.explorer();

    let first_level = explorer.element("M52-DF-5", 2017).unwrap();
    assert_eq!(first_level.rdfi, Some(Rdfi::DF));
    assert!(first_level.parent.is_none());
    assert!(first_level.top.is_none());

    let second_level = explorer.element("M52-DF-51", 2017).unwrap();
    let parent = second_level.parent.unwrap();
    assert_eq!(parent.id, "M52-DF-5");
    assert_eq!(parent.label, "M52-DF-5");
    assert_eq!(parent.amount_cents, 1_000);
    assert_eq!(second_level.top.unwrap().id, "D");
}

/// Leaves expose a one-entry partition and their raw rows.
#[test]
fn test_leaf_rows() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("M52-DF-51", 2017).unwrap();
    assert!(!view.is_leaf);
    assert!(view.ledger_rows.is_none());

    let leaf = fixture.explorer().element("DF-5", 2017).unwrap();
    assert!(leaf.is_leaf);
    let partition = leaf.year_partition.as_ref().unwrap();
    assert_eq!(partition.len(), 1);
    assert_eq!(partition[0].content_id, "DF-5");

    let rows = leaf.ledger_rows.unwrap();
    let amounts: Vec<i64> = rows.iter().map(|r| r.amount_cents).collect();
    assert_eq!(amounts, vec![600, 400, 150, -150]);
    assert_eq!(rows[0].function_label, "Personnes handicapées");
    assert_eq!(rows[1].function_label, "Famille et enfance");
}

/// A category missing from the requested year still reports other years.
#[test]
fn test_category_missing_in_requested_year() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF-4", 2017).unwrap();
    assert_eq!(view.amount_cents, None);
    assert_eq!(view.amount_by_year[&2016], Some(70));
    assert!(view.year_partition.is_none());
    assert!(view.is_leaf);
    assert!(view.expense_or_revenue.is_none());
    assert!(view.top.is_none());
}

/// Labels fall back to the raw id.
#[test]
fn test_label_fallback() {
    let fixture = Fixture::new();
    let view = fixture.explorer().element("DF-6", 2017).unwrap();
    assert_eq!(view.label, "DF-6");
    assert!(view.texts.is_none());

    let df = fixture.explorer().element("DF", 2017).unwrap();
    assert_eq!(df.label, "Dépenses de fonctionnement");
}
