//! Completion check and per-request poll task.
//!
//! A fetch started by request A is invisible to request B except through the
//! shared registry, so B re-checks the registry on a fixed interval until its
//! own URLs are terminal. Each request owns one poll task; it ends when the
//! request resolves or the handle aborts it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::{FailedResource, LoadOutcome, LoadedContent};
use crate::error::Fault;
use crate::registry::{Registry, ResourceKind, ResourceStatus};

pub(crate) type ReadyFn = Box<dyn FnOnce(Vec<LoadedContent>) + Send>;
pub(crate) type FailureFn = Box<dyn FnOnce(&[FailedResource]) + Send>;

/// One caller's batch.
pub(crate) struct LoadRequest {
    pub kind: ResourceKind,
    pub urls: Vec<String>,
    done: bool,
    on_ready: Option<ReadyFn>,
    on_failure: Option<FailureFn>,
}

enum Survey {
    Ready(Vec<LoadedContent>),
    Failed(Vec<FailedResource>),
    Waiting { in_flight: usize, failed: usize },
}

impl LoadRequest {
    pub fn new(kind: ResourceKind, urls: Vec<String>) -> Self {
        Self {
            kind,
            urls,
            done: false,
            on_ready: None,
            on_failure: None,
        }
    }

    pub fn on_ready(mut self, f: ReadyFn) -> Self {
        self.on_ready = Some(f);
        self
    }

    pub fn on_failure(mut self, f: FailureFn) -> Self {
        self.on_failure = Some(f);
        self
    }

    /// Completion check. Fires the ready callback when every URL is `Done`,
    /// or the failure callback once every URL is terminal and at least one is
    /// `Error`. Returns the outcome the first time the request resolves and
    /// `None` before that and on every later call.
    pub fn check(&mut self, registry: &Registry) -> Option<LoadOutcome> {
        if self.done {
            return None;
        }
        match survey(registry, self.kind, &self.urls) {
            Survey::Waiting { in_flight, failed } => {
                tracing::trace!(
                    kind = self.kind.label(),
                    in_flight,
                    failed,
                    total = self.urls.len(),
                    "batch not ready"
                );
                None
            }
            Survey::Ready(contents) => {
                self.done = true;
                tracing::info!(kind = self.kind.label(), count = contents.len(), "batch loaded");
                if let Some(f) = self.on_ready.take() {
                    f(contents.clone());
                }
                Some(LoadOutcome::Complete(contents))
            }
            Survey::Failed(failed) => {
                self.done = true;
                tracing::warn!(
                    kind = self.kind.label(),
                    failed = failed.len(),
                    total = self.urls.len(),
                    "batch settled with failures"
                );
                if let Some(f) = self.on_failure.take() {
                    f(&failed);
                }
                Some(LoadOutcome::Failed(failed))
            }
        }
    }
}

fn survey(registry: &Registry, kind: ResourceKind, urls: &[String]) -> Survey {
    registry.with_entries(kind, urls, |entries| {
        let mut in_flight = 0;
        let mut failed = Vec::new();
        for (url, entry) in urls.iter().zip(&entries) {
            match entry {
                Some(e) if e.status == ResourceStatus::Done => {}
                Some(e) if e.status == ResourceStatus::Error => failed.push(FailedResource {
                    url: url.clone(),
                    fault: e
                        .fault
                        .clone()
                        .unwrap_or_else(|| Fault::Fetch("unknown failure".to_string())),
                }),
                _ => in_flight += 1,
            }
        }
        if in_flight > 0 {
            return Survey::Waiting {
                in_flight,
                failed: failed.len(),
            };
        }
        if !failed.is_empty() {
            return Survey::Failed(failed);
        }
        Survey::Ready(
            urls.iter()
                .zip(entries)
                .map(|(url, entry)| LoadedContent {
                    url: url.clone(),
                    content: entry.and_then(|e| e.content.clone()),
                })
                .collect(),
        )
    })
}

/// Poll task body: re-check after each owned fetch finishes or every
/// `interval`, whichever comes first.
pub(crate) async fn drive(
    registry: Arc<Registry>,
    mut request: LoadRequest,
    mut fetched: mpsc::UnboundedReceiver<String>,
    interval: Duration,
    resolved: oneshot::Sender<LoadOutcome>,
) {
    loop {
        if let Some(outcome) = request.check(&registry) {
            let _ = resolved.send(outcome);
            return;
        }
        tokio::select! {
            Some(url) = fetched.recv() => {
                tracing::trace!(%url, "owned fetch settled");
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
