//! Shared per-kind registry maps.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::entry::{Content, ResourceEntry, ResourceKind, ResourceStatus};
use crate::error::Fault;

type KindMaps = HashMap<ResourceKind, HashMap<String, ResourceEntry>>;

/// Canonical URL -> entry, one map per resource kind.
///
/// Written by fetch completion handlers and read by every completion check.
/// Each read-modify-write below runs under a single write guard, so two load
/// requests can never both claim the same URL.
#[derive(Debug, Default)]
pub struct Registry {
    maps: RwLock<KindMaps>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, KindMaps> {
        self.maps.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, KindMaps> {
        self.maps.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, kind: ResourceKind, url: &str) -> Option<ResourceEntry> {
        self.read().get(&kind).and_then(|m| m.get(url)).cloned()
    }

    /// Status of `url`, `Unregistered` if it was never requested.
    pub fn status(&self, kind: ResourceKind, url: &str) -> ResourceStatus {
        self.read()
            .get(&kind)
            .and_then(|m| m.get(url))
            .map(|e| e.status)
            .unwrap_or(ResourceStatus::Unregistered)
    }

    /// Stores `entry` under its own kind and URL. Refuses (returns false) any
    /// transition that would move an existing entry backwards or out of a
    /// terminal state.
    pub fn set(&self, entry: ResourceEntry) -> bool {
        let mut maps = self.write();
        let map = maps.entry(entry.kind).or_default();
        if let Some(current) = map.get(&entry.url) {
            if !current.status.can_advance_to(entry.status) {
                tracing::warn!(
                    url = %entry.url,
                    kind = entry.kind.label(),
                    "refusing {:?} -> {:?}",
                    current.status,
                    entry.status
                );
                return false;
            }
        }
        map.insert(entry.url.clone(), entry);
        true
    }

    /// Creates a `Pending` entry if `url` is unknown; returns the resulting status.
    pub fn ensure_pending(&self, kind: ResourceKind, url: &str) -> ResourceStatus {
        let mut maps = self.write();
        maps.entry(kind)
            .or_default()
            .entry(url.to_string())
            .or_insert_with(|| ResourceEntry::new(kind, url, ResourceStatus::Pending))
            .status
    }

    /// Atomically moves `url` from `Pending` to `Downloading`. The caller that
    /// gets `true` owns the fetch.
    pub fn claim(&self, kind: ResourceKind, url: &str) -> bool {
        let mut maps = self.write();
        match maps.get_mut(&kind).and_then(|m| m.get_mut(url)) {
            Some(entry) if entry.status == ResourceStatus::Pending => {
                entry.status = ResourceStatus::Downloading;
                true
            }
            _ => false,
        }
    }

    /// Moves a non-terminal entry forward without touching content.
    pub fn advance(&self, kind: ResourceKind, url: &str, status: ResourceStatus) -> bool {
        let mut maps = self.write();
        match maps.get_mut(&kind).and_then(|m| m.get_mut(url)) {
            Some(entry) if entry.status.can_advance_to(status) => {
                entry.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn complete(&self, kind: ResourceKind, url: &str, content: Content) -> bool {
        let mut maps = self.write();
        match maps.get_mut(&kind).and_then(|m| m.get_mut(url)) {
            Some(entry) if entry.status.can_advance_to(ResourceStatus::Done) => {
                entry.status = ResourceStatus::Done;
                entry.content = Some(content);
                true
            }
            _ => false,
        }
    }

    pub fn fail(&self, kind: ResourceKind, url: &str, fault: Fault) -> bool {
        let mut maps = self.write();
        match maps.get_mut(&kind).and_then(|m| m.get_mut(url)) {
            Some(entry) if entry.status.can_advance_to(ResourceStatus::Error) => {
                entry.status = ResourceStatus::Error;
                entry.fault = Some(fault);
                true
            }
            _ => false,
        }
    }

    /// Marks resources the host already has as `Done` so requests for them
    /// never trigger a fetch. Entries already claimed by a fetch, or already
    /// terminal, are left to settle on their own.
    pub fn register_loaded<I, S>(&self, kind: ResourceKind, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut maps = self.write();
        let map = maps.entry(kind).or_default();
        let mut registered = 0;
        for url in urls {
            let url = url.into();
            let entry = map
                .entry(url.clone())
                .or_insert_with(|| ResourceEntry::new(kind, url, ResourceStatus::Pending));
            if matches!(entry.status, ResourceStatus::Unregistered | ResourceStatus::Pending) {
                entry.status = ResourceStatus::Done;
                registered += 1;
            }
        }
        registered
    }

    /// Snapshot of every entry of `kind`, sorted by URL.
    pub fn snapshot(&self, kind: ResourceKind) -> Vec<ResourceEntry> {
        let mut entries: Vec<ResourceEntry> = self
            .read()
            .get(&kind)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }

    /// Runs `f` over the entries for `urls` under one read guard.
    pub(crate) fn with_entries<R>(
        &self,
        kind: ResourceKind,
        urls: &[String],
        f: impl FnOnce(Vec<Option<&ResourceEntry>>) -> R,
    ) -> R {
        let maps = self.read();
        let map = maps.get(&kind);
        let entries = urls
            .iter()
            .map(|u| map.and_then(|m| m.get(u)))
            .collect();
        f(entries)
    }
}
