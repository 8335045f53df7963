use std::collections::HashMap;
use std::sync::Arc;
use crate::tree::NodeId;

/// A key-search hit as stored in the cache, detached from the tree borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CachedMatch {
    pub node: NodeId,
    pub path: String,
    pub key: String,
}

/// Results of complete key searches, keyed by the key exactly as the caller passed it.
///
/// Entries are only ever written whole, from one finished traversal. Disabling the cache
/// drops every entry.
#[derive(Debug)]
pub(crate) struct ResultCache {
    enabled: bool,
    entries: HashMap<String, Arc<[CachedMatch]>>,
}

impl ResultCache {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, entries: HashMap::new() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.clear();
        }
        self.enabled = enabled;
    }

    /// `None` when disabled or absent.
    pub fn get(&self, key: &str) -> Option<Arc<[CachedMatch]>> {
        if !self.enabled {
            return None;
        }
        self.entries.get(key).cloned()
    }

    /// No-op while disabled.
    pub fn insert(&mut self, key: &str, matches: Arc<[CachedMatch]>) {
        if self.enabled {
            self.entries.insert(key.to_string(), matches);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
