use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::listing::DirectoryListing;
use super::query::DirectoryQuery;

/// Last listing received for a query.
#[derive(Debug, Clone)]
pub struct CachedDirectory {
    pub query: DirectoryQuery,
    pub directory: Arc<DirectoryListing>,
}

/// Cache key -> last directory listing. Entries are overwritten on every
/// revalidation and never expire.
#[derive(Debug, Default)]
pub struct DiscoveryCache {
    map: RwLock<HashMap<String, CachedDirectory>>,
}

impl DiscoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CachedDirectory> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: String, entry: CachedDirectory) {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
