//! Error taxonomy shared by the loader, injector and discovery layers.
//!
//! `ValidationError` is returned synchronously from public calls. Fetch and
//! execution failures are never returned from `load`; they are recorded on the
//! registry entry as a [`Fault`] and observed by completion checks.

use thiserror::Error;

/// Network, HTTP, or body decoding failure for a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// libcurl reported an error (timeout, connection refused, DNS, ...).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body was expected to be JSON but did not parse.
    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
    /// Body was expected to be text but is not UTF-8.
    #[error("body is not valid UTF-8")]
    NotUtf8,
    /// The blocking transport task panicked or was cancelled.
    #[error("transport task failed: {0}")]
    Task(String),
}

/// Fault raised while activating downloaded script text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Missing or malformed argument to a public operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("path is required")]
    MissingPath,
    #[error("url is required")]
    MissingUrl,
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Fault recorded on a registry entry whose status is `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("execution failed: {0}")]
    Execution(String),
}

impl From<&FetchError> for Fault {
    fn from(e: &FetchError) -> Self {
        Fault::Fetch(e.to_string())
    }
}

impl From<ExecutionError> for Fault {
    fn from(e: ExecutionError) -> Self {
        Fault::Execution(e.message)
    }
}

/// Outcome error for callers that await a load (injector, CLI).
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} resource(s) failed to load: {}", .0.len(), describe(.0))]
    Failed(Vec<(String, Fault)>),
    #[error("load request aborted")]
    Aborted,
}

/// Failure of a discovery-driven operation that awaits its directory listing.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("directory request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("discovery task failed: {0}")]
    Task(String),
}

fn describe(failed: &[(String, Fault)]) -> String {
    failed
        .iter()
        .map(|(url, fault)| format!("{url} ({fault})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_from_fetch_error_keeps_message() {
        let fault = Fault::from(&FetchError::Http(404));
        assert_eq!(fault, Fault::Fetch("HTTP 404".to_string()));
        assert_eq!(fault.to_string(), "fetch failed: HTTP 404");
    }

    #[test]
    fn load_error_lists_failed_urls() {
        let err = LoadError::Failed(vec![(
            "http://h/a.js".to_string(),
            Fault::Execution("boom".to_string()),
        )]);
        let msg = err.to_string();
        assert!(msg.starts_with("1 resource(s) failed to load"));
        assert!(msg.contains("http://h/a.js (execution failed: boom)"));
    }
}
