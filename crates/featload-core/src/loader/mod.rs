//! Loader core.
//!
//! `load(kind, urls, callback, args)` makes every URL of a batch reach a
//! terminal state and fires `callback(args, context)` exactly once, when all
//! of them are `Done`:
//!
//! 1. URLs are canonicalized against the base URL.
//! 2. Unknown URLs get a `Pending` registry entry.
//! 3. `Pending` URLs are claimed (`Downloading`) and fetched by this request.
//! 4. URLs owned by another request, or already terminal, are not fetched
//!    again; this request just watches the registry.
//! 5. The completion check runs immediately, after each owned fetch settles,
//!    and on a bounded poll interval.
//!
//! A batch with an `Error` member never fires its success callback. Once every
//! member is terminal it resolves as [`LoadOutcome::Failed`] and the optional
//! failure callback (see [`Loader::load_or_else`]) fires once.
//!
//! Must be called from inside a tokio runtime.

mod fetch;
mod handle;
mod poller;
mod script;

pub use handle::LoadHandle;
pub use script::{InertScriptHost, ScriptHost};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use url::Url;

use crate::config::MIN_POLL_INTERVAL_MS;
use crate::error::{Fault, LoadError, ValidationError};
use crate::registry::{Content, Registry, ResourceKind, ResourceStatus};
use crate::transport::Transport;
use crate::url_model;
use fetch::FetchContext;
use poller::LoadRequest;

/// Second argument of a script/stylesheet/markup load callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub urls: Vec<String>,
}

/// One loaded member of a batch. `content` is `None` for resources that were
/// registered as already present rather than fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub url: String,
    pub content: Option<Content>,
}

/// One member of a data batch, as handed to `load_json` callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedJson {
    pub url: String,
    pub content: serde_json::Value,
}

impl From<LoadedContent> for LoadedJson {
    fn from(c: LoadedContent) -> Self {
        let content = match c.content {
            Some(Content::Json(v)) => v,
            Some(Content::Text(s)) => serde_json::Value::String(s),
            None => serde_json::Value::Null,
        };
        Self { url: c.url, content }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedResource {
    pub url: String,
    pub fault: Fault,
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Every URL is `Done`; contents in request order.
    Complete(Vec<LoadedContent>),
    /// Every URL is terminal and these ones are `Error`.
    Failed(Vec<FailedResource>),
    /// The poll task was aborted before the batch resolved.
    Aborted,
}

impl LoadOutcome {
    pub fn into_result(self) -> Result<Vec<LoadedContent>, LoadError> {
        match self {
            LoadOutcome::Complete(contents) => Ok(contents),
            LoadOutcome::Failed(failed) => Err(LoadError::Failed(
                failed.into_iter().map(|f| (f.url, f.fault)).collect(),
            )),
            LoadOutcome::Aborted => Err(LoadError::Aborted),
        }
    }
}

/// Deduplicating resource loader over a shared [`Registry`].
#[derive(Clone)]
pub struct Loader {
    registry: Arc<Registry>,
    transport: Arc<dyn Transport>,
    scripts: Arc<dyn ScriptHost>,
    base: Url,
    poll_interval: Duration,
}

impl Loader {
    pub fn new(
        registry: Arc<Registry>,
        transport: Arc<dyn Transport>,
        scripts: Arc<dyn ScriptHost>,
        base: Url,
        poll_interval: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            scripts,
            base,
            poll_interval: poll_interval.max(Duration::from_millis(MIN_POLL_INTERVAL_MS)),
        }
    }

    /// Recheck interval for batches waiting on fetches owned elsewhere.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn canonicalize(&self, url: &str) -> Result<String, ValidationError> {
        url_model::canonicalize(&self.base, url)
    }

    fn canonical_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Vec<String>, ValidationError> {
        urls.iter().map(|u| self.canonicalize(u.as_ref())).collect()
    }

    /// Status of `url` (canonicalized) in the `kind` registry.
    pub fn status(&self, kind: ResourceKind, url: &str) -> Result<ResourceStatus, ValidationError> {
        Ok(self.registry.status(kind, &self.canonicalize(url)?))
    }

    /// Marks resources the host already has as `Done` (e.g. scripts and
    /// stylesheets present at start-up). Returns how many entries changed.
    pub fn register_loaded<S: AsRef<str>>(
        &self,
        kind: ResourceKind,
        urls: &[S],
    ) -> Result<usize, ValidationError> {
        let urls = self.canonical_urls(urls)?;
        Ok(self.registry.register_loaded(kind, urls))
    }

    /// Loads a batch without callbacks; await the handle for the outcome.
    pub fn request<S: AsRef<str>>(
        &self,
        kind: ResourceKind,
        urls: &[S],
    ) -> Result<LoadHandle, ValidationError> {
        let urls = self.canonical_urls(urls)?;
        Ok(self.start(LoadRequest::new(kind, urls)))
    }

    /// Loads a batch and fires `callback(callback_args, {urls})` once every
    /// URL is `Done`.
    pub fn load<S, A, F>(
        &self,
        kind: ResourceKind,
        urls: &[S],
        callback: F,
        callback_args: A,
    ) -> Result<LoadHandle, ValidationError>
    where
        S: AsRef<str>,
        A: Send + 'static,
        F: FnOnce(A, LoadContext) + Send + 'static,
    {
        self.load_or_else(kind, urls, callback, |_| {}, callback_args)
    }

    /// Like [`Loader::load`], plus `on_failure` once every URL is terminal and
    /// at least one failed. At most one of the two callbacks ever fires.
    pub fn load_or_else<S, A, F, E>(
        &self,
        kind: ResourceKind,
        urls: &[S],
        callback: F,
        on_failure: E,
        callback_args: A,
    ) -> Result<LoadHandle, ValidationError>
    where
        S: AsRef<str>,
        A: Send + 'static,
        F: FnOnce(A, LoadContext) + Send + 'static,
        E: FnOnce(&[FailedResource]) + Send + 'static,
    {
        let urls = self.canonical_urls(urls)?;
        let context = LoadContext { urls: urls.clone() };
        let request = LoadRequest::new(kind, urls)
            .on_ready(Box::new(move |_| callback(callback_args, context)))
            .on_failure(Box::new(on_failure));
        Ok(self.start(request))
    }

    pub fn load_js<S, A, F>(&self, urls: &[S], callback: F, callback_args: A) -> Result<LoadHandle, ValidationError>
    where
        S: AsRef<str>,
        A: Send + 'static,
        F: FnOnce(A, LoadContext) + Send + 'static,
    {
        self.load(ResourceKind::Script, urls, callback, callback_args)
    }

    pub fn load_css<S, A, F>(&self, urls: &[S], callback: F, callback_args: A) -> Result<LoadHandle, ValidationError>
    where
        S: AsRef<str>,
        A: Send + 'static,
        F: FnOnce(A, LoadContext) + Send + 'static,
    {
        self.load(ResourceKind::Stylesheet, urls, callback, callback_args)
    }

    /// Data variant: the callback receives `[{url, content}]` in `urls` order.
    pub fn load_json<S, A, F>(&self, urls: &[S], callback: F, callback_args: A) -> Result<LoadHandle, ValidationError>
    where
        S: AsRef<str>,
        A: Send + 'static,
        F: FnOnce(Vec<LoadedJson>, A) + Send + 'static,
    {
        let urls = self.canonical_urls(urls)?;
        let request = LoadRequest::new(ResourceKind::Data, urls).on_ready(Box::new(move |contents| {
            callback(contents.into_iter().map(LoadedJson::from).collect(), callback_args)
        }));
        Ok(self.start(request))
    }

    fn start(&self, mut request: LoadRequest) -> LoadHandle {
        let kind = request.kind;
        for url in &request.urls {
            self.registry.ensure_pending(kind, url);
        }

        let (fetched_tx, fetched_rx) = mpsc::unbounded_channel();
        for url in &request.urls {
            if self.registry.claim(kind, url) {
                tracing::debug!(%url, kind = kind.label(), "downloading");
                tokio::spawn(fetch::fetch_resource(
                    self.fetch_context(),
                    kind,
                    url.clone(),
                    fetched_tx.clone(),
                ));
            }
        }
        drop(fetched_tx);

        let urls = request.urls.clone();
        if let Some(outcome) = request.check(&self.registry) {
            return LoadHandle::resolved(urls, outcome);
        }

        let (resolved_tx, resolved_rx) = oneshot::channel();
        let task = tokio::spawn(poller::drive(
            Arc::clone(&self.registry),
            request,
            fetched_rx,
            self.poll_interval,
            resolved_tx,
        ));
        LoadHandle::polling(urls, task, resolved_rx)
    }

    fn fetch_context(&self) -> FetchContext {
        FetchContext {
            registry: Arc::clone(&self.registry),
            transport: Arc::clone(&self.transport),
            scripts: Arc::clone(&self.scripts),
        }
    }
}
