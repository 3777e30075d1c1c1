//! Drives [`Navbar::place`] from discovered button descriptors.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use tokio::sync::mpsc;

use super::{NavButton, Navbar, Placed};
use crate::error::DiscoveryError;
use crate::injector::{InjectedMarkup, Injector, Placement};
use crate::plugins::{LoadedEntryContext, PluginIterator};

/// Per-feature button descriptor: `{"items": [{"href": ..., "tab": ...}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ButtonDescriptor {
    #[serde(default)]
    pub items: Vec<ButtonItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonItem {
    /// Endpoint-relative markup URL.
    pub href: String,
    #[serde(default)]
    pub tab: Option<String>,
}

fn lock(navbar: &Mutex<Navbar>) -> MutexGuard<'_, Navbar> {
    navbar.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Discovers button descriptors at `path`, loads every button's markup
/// through `injector` and places it into `navbar`. Features already in the
/// navbar or missing from its order are skipped. Returns the number of
/// buttons in the navbar once every discovered button has been handled.
pub async fn install_buttons(
    plugins: &PluginIterator,
    injector: &Injector,
    navbar: Arc<Mutex<Navbar>>,
    path: &str,
) -> Result<usize, DiscoveryError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let discovery = plugins.discovery().clone();
    let injector = injector.clone();
    let shared = Arc::clone(&navbar);

    let task = plugins.each_json(
        path,
        move |json, ctx: LoadedEntryContext<()>| {
            let feature = ctx.entry.feature;
            {
                let navbar = lock(&shared);
                if navbar.contains_feature(&feature) {
                    tracing::debug!(%feature, "feature already in navbar");
                    return;
                }
                if navbar.rank(&feature).is_none() {
                    tracing::debug!(%feature, "feature not in navbar order, skipped");
                    return;
                }
            }
            let descriptor: ButtonDescriptor = match serde_json::from_value(json) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(url = %ctx.url, "invalid button descriptor: {}", e);
                    return;
                }
            };
            for (index, item) in descriptor.items.into_iter().enumerate() {
                let url = discovery.resolve_href(&item.href);
                let injector = injector.clone();
                let navbar = Arc::clone(&shared);
                let feature = feature.clone();
                let placement = Placement::callback(move |markup: InjectedMarkup, ()| {
                    let button = NavButton {
                        feature,
                        index,
                        tab: item.tab,
                        markup: markup.content,
                    };
                    if let Placed::Duplicate = lock(&navbar).place(button) {
                        tracing::debug!(url = %markup.url, "button already placed");
                    }
                });
                let _ = tx.send(tokio::spawn(async move {
                    if let Err(e) = injector.inject(&url, placement, ()).await {
                        tracing::warn!(%url, "navbar button not loaded: {}", e);
                    }
                }));
            }
        },
        (),
    )?;

    task.await.map_err(|e| DiscoveryError::Task(e.to_string()))??;
    while let Some(button) = rx.recv().await {
        button.await.map_err(|e| DiscoveryError::Task(e.to_string()))?;
    }

    let navbar = lock(&navbar);
    tracing::info!(
        buttons = navbar.buttons().len(),
        active = ?navbar.active().map(|b| (&b.feature, b.index)),
        "navbar installed"
    );
    Ok(navbar.buttons().len())
}
