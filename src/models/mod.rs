pub mod category;
pub mod ledger;
pub mod partition;
pub mod texts;

pub use category::{CategoryNode, CategoryTree, NodeId, TreeBuilder};
pub use ledger::{Direction, LedgerRow, LedgerSnapshot, Rdfi, Section};
pub use partition::{ContextSummary, LedgerRowView, PartitionEntry};
pub use texts::{TextsCsvRow, TextsRecord};
