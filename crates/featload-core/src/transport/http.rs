//! libcurl-backed transport: one Easy handle per GET, body collected in memory.

use std::time::Duration;

use super::Transport;
use crate::config::FeatloadConfig;
use crate::error::FetchError;
use crate::retry::{run_with_retry, RetryPolicy};

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&FeatloadConfig::default())
    }
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            connect_timeout,
            timeout,
            retry,
        }
    }

    pub fn from_config(cfg: &FeatloadConfig) -> Self {
        let retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from_config)
            .unwrap_or_default();
        Self::new(cfg.connect_timeout(), cfg.request_timeout(), retry)
    }

    fn get_once(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Accept: {accept}"))?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(%url, accept, "GET");
        run_with_retry(&self.retry, || self.get_once(url, accept))
    }
}
