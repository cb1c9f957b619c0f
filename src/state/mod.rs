//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Ledger`: the set of query names already processed in this run
//! - `LedgerSeed`: where the ledger starts from when a run begins

mod ledger;

// Re-export main types
pub use ledger::{Ledger, LedgerSeed};
