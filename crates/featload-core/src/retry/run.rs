//! Retry loop: run a blocking closure until success or the policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::FetchError;

/// Runs `f` until it succeeds or the retry policy says to stop, sleeping the
/// backoff between attempts. Blocking; call from the blocking pool.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, "retrying after {:?}: {}", d, e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn retries_transient_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast(3), || {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Http(503))
            } else {
                Ok("body")
            }
        });
        assert_eq!(out.unwrap(), "body");
        assert_eq!(calls, 3);
    }

    #[test]
    fn stops_on_permanent_error() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(5), || {
            calls += 1;
            Err(FetchError::Http(404))
        });
        assert!(matches!(out, Err(FetchError::Http(404))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(2), || {
            calls += 1;
            Err(FetchError::Http(500))
        });
        assert!(out.is_err());
        assert_eq!(calls, 2);
    }
}
