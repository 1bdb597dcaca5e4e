// Utility module exports

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub mod date;

/// Stable within-process hash.
///
/// Rows are keyed by the hash of their displayed hour and the current-time
/// indicator dedupes ticks by the hash of the minute value.
pub fn value_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
