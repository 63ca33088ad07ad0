//! Stock info caching.

use journal_core::types::StockInfo;
use std::collections::HashMap;

/// Simple in-memory stock info cache.
///
/// Entries are written on a miss and kept for the life of the process;
/// nothing is invalidated or evicted.
#[derive(Debug, Default)]
pub struct InfoCache {
    cache: HashMap<String, StockInfo>,
}

impl InfoCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cached info.
    pub fn get(&self, code: &str) -> Option<&StockInfo> {
        self.cache.get(code)
    }

    /// Store info, replacing any previous entry.
    pub fn put(&mut self, code: &str, info: StockInfo) {
        self.cache.insert(code.to_string(), info);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.cache.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
