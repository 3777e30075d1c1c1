//! Markup injector: loads a markup resource once and places it into the host
//! element tree.

mod document;

pub use document::Document;

use std::sync::Arc;

use crate::error::LoadError;
use crate::loader::Loader;
use crate::registry::ResourceKind;

/// Host element tree the injector writes into.
pub trait MarkupHost: Send + Sync {
    fn has_container(&self, id: &str) -> bool;

    /// Replaces the whole content of container `id`.
    fn replace_container(&self, id: &str, markup: &str);

    /// Replaces the content of sub-region `region` inside `container`,
    /// creating the region on first use.
    fn replace_region(&self, container: &str, region: &str, markup: &str);

    /// Brings `region` of `container` to the front.
    fn activate_region(&self, container: &str, region: &str);
}

/// First callback argument: the URL and the markup that was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedMarkup {
    pub url: String,
    pub content: String,
}

pub type InjectCallback<A> = Box<dyn FnOnce(InjectedMarkup, A) + Send>;

/// Where loaded markup goes.
pub enum Placement<A> {
    /// Replace the whole container.
    Container {
        into: String,
        callback: Option<InjectCallback<A>>,
    },
    /// Replace one named sub-region of the container.
    Tabbed {
        into: String,
        tab: String,
        activate: bool,
        callback: Option<InjectCallback<A>>,
    },
    /// Hand the markup to the callback and place nothing.
    Callback(InjectCallback<A>),
}

impl<A> Placement<A> {
    pub fn container(into: impl Into<String>) -> Self {
        Placement::Container {
            into: into.into(),
            callback: None,
        }
    }

    pub fn tabbed(into: impl Into<String>, tab: impl Into<String>, activate: bool) -> Self {
        Placement::Tabbed {
            into: into.into(),
            tab: tab.into(),
            activate,
            callback: None,
        }
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(InjectedMarkup, A) + Send + 'static,
    {
        Placement::Callback(Box::new(f))
    }

    /// Attaches (or replaces) the completion callback of a container placement.
    pub fn with_callback<F>(self, f: F) -> Self
    where
        F: FnOnce(InjectedMarkup, A) + Send + 'static,
    {
        let f: InjectCallback<A> = Box::new(f);
        match self {
            Placement::Container { into, .. } => Placement::Container {
                into,
                callback: Some(f),
            },
            Placement::Tabbed {
                into, tab, activate, ..
            } => Placement::Tabbed {
                into,
                tab,
                activate,
                callback: Some(f),
            },
            Placement::Callback(_) => Placement::Callback(f),
        }
    }
}

impl<A> std::fmt::Debug for Placement<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Container { into, callback } => f
                .debug_struct("Container")
                .field("into", into)
                .field("callback", &callback.is_some())
                .finish(),
            Placement::Tabbed {
                into,
                tab,
                activate,
                callback,
            } => f
                .debug_struct("Tabbed")
                .field("into", into)
                .field("tab", tab)
                .field("activate", activate)
                .field("callback", &callback.is_some())
                .finish(),
            Placement::Callback(_) => f.write_str("Callback"),
        }
    }
}

#[derive(Clone)]
pub struct Injector {
    loader: Loader,
    host: Arc<dyn MarkupHost>,
}

impl Injector {
    pub fn new(loader: Loader, host: Arc<dyn MarkupHost>) -> Self {
        Self { loader, host }
    }

    pub fn host(&self) -> &Arc<dyn MarkupHost> {
        &self.host
    }

    /// Loads the markup at `url` (fetching it at most once per session) and
    /// places it per `placement`. The callback, if any, receives
    /// `({url, content}, callback_args)` after placement.
    ///
    /// A missing target container is logged and skipped; the callback still
    /// fires. Fetch failures are returned as `LoadError::Failed`.
    pub async fn inject<A>(
        &self,
        url: &str,
        placement: Placement<A>,
        callback_args: A,
    ) -> Result<InjectedMarkup, LoadError> {
        let handle = self.loader.request(ResourceKind::Markup, &[url])?;
        if handle.resolved_immediately() {
            tracing::debug!(url, "markup already loaded");
        }
        let url = handle.urls().first().cloned().unwrap_or_default();
        let content = handle
            .wait()
            .await
            .into_result()?
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.as_text().map(str::to_owned))
            .unwrap_or_default();

        let injected = InjectedMarkup { url, content };
        let callback = self.place(&injected, placement);
        if let Some(callback) = callback {
            callback(injected.clone(), callback_args);
        }
        Ok(injected)
    }

    fn place<A>(&self, markup: &InjectedMarkup, placement: Placement<A>) -> Option<InjectCallback<A>> {
        match placement {
            Placement::Container { into, callback } => {
                if self.host.has_container(&into) {
                    self.host.replace_container(&into, &markup.content);
                    tracing::debug!(url = %markup.url, container = %into, "markup placed");
                } else {
                    tracing::warn!(url = %markup.url, container = %into, "target container not found");
                }
                callback
            }
            Placement::Tabbed {
                into,
                tab,
                activate,
                callback,
            } => {
                if self.host.has_container(&into) {
                    self.host.replace_region(&into, &tab, &markup.content);
                    tracing::debug!(url = %markup.url, container = %into, %tab, "markup placed");
                    if activate {
                        self.host.activate_region(&into, &tab);
                    }
                } else {
                    tracing::warn!(url = %markup.url, container = %into, "target container not found");
                }
                callback
            }
            Placement::Callback(callback) => Some(callback),
        }
    }
}

#[cfg(test)]
mod tests;
