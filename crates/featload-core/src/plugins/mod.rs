//! Plugin iterator: discovery plus loading.
//!
//! "each" modes call back once per directory entry that has a download link;
//! the `_json`/`_js` variants load that link first. "all" modes load every
//! download link of the listing as one batch and call back once it is done.
//!
//! Every mode runs once per directory delivery, so a cached listing followed
//! by its revalidation yields two rounds of callbacks; contexts carry the
//! [`Freshness`](crate::discovery::Freshness) of the listing they came from.
//! The returned [`PluginTask`] finishes after the revalidated round has fully
//! loaded.

mod context;

pub use context::{EntryContext, LoadedEntryContext};

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::discovery::{DirectoryEntry, DirectoryQuery, DirectoryResult, DirectoryTask, Discovery};
use crate::error::{FetchError, ValidationError};
use crate::loader::{LoadContext, LoadHandle, LoadOutcome, LoadedJson, Loader};

/// Completion of an iterator call: the directory revalidation result, after
/// every load it triggered has resolved.
pub type PluginTask = JoinHandle<Result<(), FetchError>>;

#[derive(Clone)]
pub struct PluginIterator {
    discovery: Discovery,
    loader: Loader,
}

impl PluginIterator {
    pub fn new(discovery: Discovery, loader: Loader) -> Self {
        Self { discovery, loader }
    }

    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// `callback(entry, context)` for every entry with a download link, in
    /// listing order, once per delivery.
    pub fn each<A, F>(&self, path: &str, mut callback: F, callback_args: A) -> Result<PluginTask, ValidationError>
    where
        A: Clone + Send + 'static,
        F: FnMut(&DirectoryEntry, EntryContext<A>) + Send + 'static,
    {
        let path = required(path)?;
        let query = DirectoryQuery::new(path.clone());
        let task = self.discovery.directory(query, move |result| {
            tracing::debug!(
                %path,
                entries = result.directory.entries.len(),
                freshness = ?result.freshness,
                "each: listing delivered"
            );
            for entry in &result.directory.entries {
                if entry.download_link().is_none() {
                    continue;
                }
                callback(entry, EntryContext::new(&path, &result, callback_args.clone()));
            }
        })?;
        Ok(flatten(task))
    }

    /// Loads each entry's download link as data and calls
    /// `callback(content, context)` per entry as soon as it is loaded.
    pub fn each_json<A, F>(&self, path: &str, callback: F, callback_args: A) -> Result<PluginTask, ValidationError>
    where
        A: Clone + Send + 'static,
        F: FnMut(serde_json::Value, LoadedEntryContext<A>) + Send + 'static,
    {
        let callback = Arc::new(Mutex::new(callback));
        self.each_loaded(path, callback_args, move |loader, url, ctx| {
            let callback = Arc::clone(&callback);
            loader.load_json(
                &[url],
                move |mut items: Vec<LoadedJson>, ctx: LoadedEntryContext<A>| {
                    let content = items.pop().map(|item| item.content).unwrap_or_default();
                    let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
                    (*callback)(content, ctx);
                },
                ctx,
            )
        })
    }

    /// Loads each entry's download link as a script and calls
    /// `callback(context, {urls})` per entry once it has run.
    pub fn each_js<A, F>(&self, path: &str, callback: F, callback_args: A) -> Result<PluginTask, ValidationError>
    where
        A: Clone + Send + 'static,
        F: FnMut(LoadedEntryContext<A>, LoadContext) + Send + 'static,
    {
        let callback = Arc::new(Mutex::new(callback));
        self.each_loaded(path, callback_args, move |loader, url, ctx| {
            let callback = Arc::clone(&callback);
            loader.load_js(
                &[url],
                move |ctx: LoadedEntryContext<A>, request: LoadContext| {
                    let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
                    (*callback)(ctx, request);
                },
                ctx,
            )
        })
    }

    /// Loads every download link of the listing as one script batch and calls
    /// `callback(result)` once the batch is done. A listing without download
    /// links never calls back.
    pub fn all<F>(&self, path: &str, callback: F) -> Result<PluginTask, ValidationError>
    where
        F: FnMut(DirectoryResult) + Send + 'static,
    {
        let callback = Arc::new(Mutex::new(callback));
        self.all_loaded(path, move |loader, urls, result| {
            let callback = Arc::clone(&callback);
            loader.load_js(
                urls.as_slice(),
                move |result: DirectoryResult, _| {
                    let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
                    (*callback)(result);
                },
                result,
            )
        })
    }

    /// Data variant of [`all`](Self::all): `callback(contents, result)` with
    /// contents in listing order.
    pub fn all_json<F>(&self, path: &str, callback: F) -> Result<PluginTask, ValidationError>
    where
        F: FnMut(Vec<LoadedJson>, DirectoryResult) + Send + 'static,
    {
        let callback = Arc::new(Mutex::new(callback));
        self.all_loaded(path, move |loader, urls, result| {
            let callback = Arc::clone(&callback);
            loader.load_json(
                urls.as_slice(),
                move |items, result: DirectoryResult| {
                    let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
                    (*callback)(items, result);
                },
                result,
            )
        })
    }

    /// Shared body of the `each_*` loaders: `start` issues one load per entry;
    /// the returned task also awaits those loads.
    fn each_loaded<A, S>(&self, path: &str, callback_args: A, mut start: S) -> Result<PluginTask, ValidationError>
    where
        A: Clone + Send + 'static,
        S: FnMut(&Loader, String, LoadedEntryContext<A>) -> Result<LoadHandle, ValidationError> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = self.loader.clone();
        let discovery = self.discovery.clone();
        let task = self.each(
            path,
            move |entry, ctx| {
                let Some(link) = entry.download_link() else {
                    return;
                };
                let url = discovery.resolve_href(&link.href);
                let ctx = LoadedEntryContext::new(ctx, entry.clone(), url.clone());
                match start(&loader, url.clone(), ctx) {
                    Ok(handle) => {
                        let _ = tx.send(handle);
                    }
                    Err(e) => tracing::warn!(%url, feature = %entry.feature, "cannot load entry: {}", e),
                }
            },
            callback_args,
        )?;
        Ok(drain(task, rx))
    }

    fn all_loaded<S>(&self, path: &str, mut start: S) -> Result<PluginTask, ValidationError>
    where
        S: FnMut(&Loader, Vec<String>, DirectoryResult) -> Result<LoadHandle, ValidationError> + Send + 'static,
    {
        let path = required(path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = self.loader.clone();
        let discovery = self.discovery.clone();
        let task = self.discovery.directory(DirectoryQuery::new(path.clone()), move |result| {
            let urls: Vec<String> = result
                .directory
                .all_download_links()
                .into_iter()
                .map(|link| discovery.resolve_href(&link.href))
                .collect();
            if urls.is_empty() {
                tracing::debug!(%path, freshness = ?result.freshness, "all: no download links, nothing to load");
                return;
            }
            tracing::debug!(%path, urls = urls.len(), freshness = ?result.freshness, "all: loading batch");
            match start(&loader, urls, result) {
                Ok(handle) => {
                    let _ = tx.send(handle);
                }
                Err(e) => tracing::warn!(%path, "cannot load batch: {}", e),
            }
        })?;
        Ok(drain(flatten(task), rx))
    }
}

fn required(path: &str) -> Result<String, ValidationError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ValidationError::MissingPath);
    }
    Ok(path.to_string())
}

fn flatten(task: DirectoryTask) -> PluginTask {
    tokio::spawn(async move { task.await.map_err(|e| FetchError::Task(e.to_string()))? })
}

/// Waits for the directory task, then for every load it started. The sender
/// lives in the directory callback, so the channel closes once that callback
/// is dropped with its task.
fn drain(task: PluginTask, mut loads: mpsc::UnboundedReceiver<LoadHandle>) -> PluginTask {
    tokio::spawn(async move {
        let revalidated = task.await.map_err(|e| FetchError::Task(e.to_string()))?;
        while let Some(handle) = loads.recv().await {
            if let LoadOutcome::Failed(failed) = handle.wait().await {
                for f in &failed {
                    tracing::warn!(url = %f.url, "plugin resource failed: {}", f.fault);
                }
            }
        }
        revalidated
    })
}
