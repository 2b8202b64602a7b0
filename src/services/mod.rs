pub mod aggregation;
pub mod alignment;
pub mod ancestors;
pub mod detail;
pub mod element_index;
pub mod finance_element;
pub mod flatten;
pub mod ledger_csv;
pub mod merge;
pub mod partition;

pub use alignment::{align_partitions, PartitionByYear};
pub use element_index::{ElementIndex, NodeRef, TreeSource};
pub use finance_element::{Explorer, FinanceElementView};
pub use merge::{MergeRule, MergeRules};
pub use partition::{finance_details_url, project_partition, TextsLookup};
