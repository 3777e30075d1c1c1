//! Retry and backoff policy for transport GETs.
//!
//! Classifies fetch failures (timeouts, throttling, connection failures, 5xx)
//! and decides exponential backoff, so the curl transport and any other
//! `Transport` implementation share one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
