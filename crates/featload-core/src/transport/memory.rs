//! In-memory transport for unit tests: canned bodies per URL, hit counters,
//! optional per-GET delay so overlapping requests really overlap.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::Transport;
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Reply {
    Body(Vec<u8>),
    Status(u32),
}

#[derive(Debug, Default)]
struct Route {
    replies: Vec<Reply>,
    hits: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryTransport {
    routes: Mutex<HashMap<String, Route>>,
    accepts: Mutex<Vec<(String, String)>>,
    delay: Duration,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Adds a reply for `url`. Replies are served in order; the last one repeats.
    pub fn respond(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.push(url, Reply::Body(body.into()));
        self
    }

    pub fn fail(self, url: &str, status: u32) -> Self {
        self.push(url, Reply::Status(status));
        self
    }

    fn push(&self, url: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .replies
            .push(reply);
    }

    pub fn hits(&self, url: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .map(|r| r.hits)
            .unwrap_or(0)
    }

    /// `Accept` header sent with each GET, in request order.
    pub fn accepts(&self) -> Vec<(String, String)> {
        self.accepts.lock().unwrap().clone()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        self.accepts
            .lock()
            .unwrap()
            .push((url.to_string(), accept.to_string()));
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.get_mut(url) else {
            return Err(FetchError::Http(404));
        };
        let reply = route
            .replies
            .get(route.hits)
            .or_else(|| route.replies.last())
            .cloned();
        route.hits += 1;
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(code)) => Err(FetchError::Http(code)),
            None => Err(FetchError::Http(404)),
        }
    }
}
