//! Artifact transport.
//!
//! The loader and the discovery layer only depend on the [`Transport`] trait.
//! Implementations are blocking (libcurl); async callers go through [`fetch`],
//! which runs the GET on tokio's blocking pool.

mod http;
#[cfg(test)]
pub(crate) mod memory;

pub use http::CurlTransport;

use std::sync::Arc;

use crate::error::FetchError;

/// Blocking HTTP GET returning the raw body of a 2xx response.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError>;
}

/// Runs `transport.get` on the blocking pool.
pub async fn fetch(
    transport: Arc<dyn Transport>,
    url: String,
    accept: &'static str,
) -> Result<Vec<u8>, FetchError> {
    tokio::task::spawn_blocking(move || transport.get(&url, accept))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}
