//! Fetch task for a URL claimed by a load request.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::script::ScriptHost;
use crate::error::{Fault, FetchError};
use crate::registry::{Content, Registry, ResourceKind, ResourceStatus};
use crate::transport::{self, Transport};

#[derive(Clone)]
pub(crate) struct FetchContext {
    pub registry: Arc<Registry>,
    pub transport: Arc<dyn Transport>,
    pub scripts: Arc<dyn ScriptHost>,
}

/// Downloads `url`, settles its registry entry to `Done` or `Error`, then
/// tells the owning request. Runs detached from the request's poll task so an
/// aborted request never strands the entry in `Downloading`.
pub(crate) async fn fetch_resource(
    ctx: FetchContext,
    kind: ResourceKind,
    url: String,
    finished: mpsc::UnboundedSender<String>,
) {
    match transport::fetch(Arc::clone(&ctx.transport), url.clone(), kind.accept()).await {
        Ok(body) => settle(&ctx, kind, &url, body),
        Err(e) => {
            tracing::warn!(%url, kind = kind.label(), "cannot load: {}", e);
            ctx.registry.fail(kind, &url, Fault::from(&e));
        }
    }
    let _ = finished.send(url);
}

fn settle(ctx: &FetchContext, kind: ResourceKind, url: &str, body: Vec<u8>) {
    let settled = match kind {
        ResourceKind::Script => {
            ctx.registry.advance(kind, url, ResourceStatus::Executing);
            match String::from_utf8(body) {
                Ok(source) => ctx
                    .scripts
                    .execute(url, &source)
                    .map(|()| Content::Text(source))
                    .map_err(Fault::from),
                Err(_) => Err(Fault::from(&FetchError::NotUtf8)),
            }
        }
        ResourceKind::Data => serde_json::from_slice(&body)
            .map(Content::Json)
            .map_err(|e| Fault::from(&FetchError::Decode(e))),
        ResourceKind::Markup | ResourceKind::Stylesheet => String::from_utf8(body)
            .map(Content::Text)
            .map_err(|_| Fault::from(&FetchError::NotUtf8)),
    };
    match settled {
        Ok(content) => {
            tracing::debug!(%url, kind = kind.label(), "done");
            ctx.registry.complete(kind, url, content);
        }
        Err(fault) => {
            tracing::warn!(%url, kind = kind.label(), "{}", fault);
            ctx.registry.fail(kind, url, fault);
        }
    }
}
