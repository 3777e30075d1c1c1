use std::sync::Arc;

use crate::discovery::{DirectoryEntry, DirectoryListing, DirectoryQuery, DirectoryResult, Freshness};

/// Second argument of an [`each`](super::PluginIterator::each) callback.
#[derive(Debug, Clone)]
pub struct EntryContext<A> {
    pub path: String,
    pub query: DirectoryQuery,
    pub directory: Arc<DirectoryListing>,
    pub freshness: Freshness,
    pub callback_args: A,
}

impl<A> EntryContext<A> {
    pub(crate) fn new(path: &str, result: &DirectoryResult, callback_args: A) -> Self {
        Self {
            path: path.to_string(),
            query: result.query.clone(),
            directory: Arc::clone(&result.directory),
            freshness: result.freshness,
            callback_args,
        }
    }
}

/// Context for `each_json`/`each_js` callbacks: the entry context plus the
/// entry itself and the URL its artifact was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedEntryContext<A> {
    pub url: String,
    pub path: String,
    pub query: DirectoryQuery,
    pub directory: Arc<DirectoryListing>,
    pub freshness: Freshness,
    pub entry: DirectoryEntry,
    pub callback_args: A,
}

impl<A> LoadedEntryContext<A> {
    pub(crate) fn new(ctx: EntryContext<A>, entry: DirectoryEntry, url: String) -> Self {
        Self {
            url,
            path: ctx.path,
            query: ctx.query,
            directory: ctx.directory,
            freshness: ctx.freshness,
            entry,
            callback_args: ctx.callback_args,
        }
    }
}
