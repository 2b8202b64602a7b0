pub mod ledger;
pub mod texts;

pub use ledger::{LedgerSource, LedgerStore};
pub use texts::{FunctionLabels, TextsStore};
