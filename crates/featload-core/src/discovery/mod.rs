//! Feature discovery: directory queries against the service, with a
//! cache-then-revalidate cache in front.
//!
//! `directory(query, callback)` delivers the cached listing synchronously when
//! one exists, then always asks the service again, stores the fresh listing
//! and delivers it. The callback can therefore fire twice; each delivery says
//! which one it is via [`Freshness`].

mod cache;
mod listing;
mod query;

pub use cache::{CachedDirectory, DiscoveryCache};
pub use listing::{DirectoryEntry, DirectoryListing, Link, DOWNLOAD_REL};
pub use query::DirectoryQuery;

use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::error::{FetchError, ValidationError};
use crate::transport::{self, Transport};
use crate::url_model;

const DIRECTORY_PATH: &str = "/html5/directory";
const PUBLIC_DIRECTORY_PATH: &str = "/html5/public/directory";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from the cache before revalidation.
    Cached,
    /// Just fetched from the directory service.
    Revalidated,
}

/// One delivery of a directory listing.
#[derive(Debug, Clone)]
pub struct DirectoryResult {
    pub query: DirectoryQuery,
    pub directory: Arc<DirectoryListing>,
    pub freshness: Freshness,
}

/// Revalidation task returned by [`Discovery::directory`].
pub type DirectoryTask = JoinHandle<Result<(), FetchError>>;

#[derive(Clone)]
pub struct Discovery {
    endpoint: String,
    transport: Arc<dyn Transport>,
    cache: Arc<DiscoveryCache>,
}

impl Discovery {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn Transport>, cache: Arc<DiscoveryCache>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            cache,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache(&self) -> &Arc<DiscoveryCache> {
        &self.cache
    }

    /// Resolves a directory href (endpoint-relative) to a loadable URL.
    pub fn resolve_href(&self, href: &str) -> String {
        url_model::join_endpoint(&self.endpoint, href)
    }

    /// Service URL for an already canonical query.
    pub fn directory_url(&self, query: &DirectoryQuery) -> Result<String, ValidationError> {
        let path = if query.public {
            PUBLIC_DIRECTORY_PATH
        } else {
            DIRECTORY_PATH
        };
        let raw = url_model::join_endpoint(&self.endpoint, path);
        let mut url = Url::parse(&raw).map_err(|e| ValidationError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().extend_pairs(query.params());
        Ok(url.to_string())
    }

    /// Delivers the cached listing for `query` (synchronously, if any), then
    /// revalidates in a spawned task and delivers the fresh listing.
    ///
    /// A failed revalidation leaves the cache untouched and is returned by
    /// the task; the callback does not see it.
    pub fn directory<F>(&self, query: DirectoryQuery, mut callback: F) -> Result<DirectoryTask, ValidationError>
    where
        F: FnMut(DirectoryResult) + Send + 'static,
    {
        let query = query.canonicalize()?;
        let url = self.directory_url(&query)?;
        let key = query.cache_key();

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(%key, "directory served from cache");
            callback(DirectoryResult {
                query: cached.query,
                directory: cached.directory,
                freshness: Freshness::Cached,
            });
        }

        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        Ok(tokio::spawn(async move {
            let listing = match fetch_listing(transport, url.clone()).await {
                Ok(listing) => Arc::new(listing),
                Err(e) => {
                    tracing::warn!(%url, "directory request failed: {}", e);
                    return Err(e);
                }
            };
            tracing::info!(%key, entries = listing.entries.len(), "directory revalidated");
            cache.insert(
                key,
                CachedDirectory {
                    query: query.clone(),
                    directory: Arc::clone(&listing),
                },
            );
            callback(DirectoryResult {
                query,
                directory: listing,
                freshness: Freshness::Revalidated,
            });
            Ok(())
        }))
    }
}

async fn fetch_listing(transport: Arc<dyn Transport>, url: String) -> Result<DirectoryListing, FetchError> {
    let body = transport::fetch(transport, url, "application/json").await?;
    Ok(serde_json::from_slice(&body)?)
}
