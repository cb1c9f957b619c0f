//! Text normalization for query names and result titles
//!
//! Query names are used as dedup keys, so they are folded to lowercase.
//! Result titles keep their case and are only trimmed.

mod normalize;

pub use normalize::{normalize_query, normalize_title, Normalizer};
