use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::LoadOutcome;

enum State {
    Resolved(LoadOutcome),
    Polling {
        task: JoinHandle<()>,
        outcome: oneshot::Receiver<LoadOutcome>,
    },
}

/// Handle to one load request.
///
/// Dropping the handle does not cancel anything: the request keeps polling
/// and its callback still fires. Use [`LoadHandle::abort`] to end the poll
/// task early.
pub struct LoadHandle {
    urls: Vec<String>,
    state: State,
}

impl LoadHandle {
    pub(crate) fn resolved(urls: Vec<String>, outcome: LoadOutcome) -> Self {
        Self {
            urls,
            state: State::Resolved(outcome),
        }
    }

    pub(crate) fn polling(
        urls: Vec<String>,
        task: JoinHandle<()>,
        outcome: oneshot::Receiver<LoadOutcome>,
    ) -> Self {
        Self {
            urls,
            state: State::Polling { task, outcome },
        }
    }

    /// Canonical URLs of the batch, in request order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// True if the request resolved during the `load` call itself.
    pub fn resolved_immediately(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    /// Stops the poll task. Fetches already in flight still complete and
    /// update the registry; only this request's callbacks are dropped.
    pub fn abort(&self) {
        if let State::Polling { task, .. } = &self.state {
            task.abort();
        }
    }

    pub async fn wait(self) -> LoadOutcome {
        match self.state {
            State::Resolved(outcome) => outcome,
            State::Polling { outcome, .. } => outcome.await.unwrap_or(LoadOutcome::Aborted),
        }
    }
}

impl std::fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadHandle")
            .field("urls", &self.urls)
            .field("resolved_immediately", &self.resolved_immediately())
            .finish()
    }
}
