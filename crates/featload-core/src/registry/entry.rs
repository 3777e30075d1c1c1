//! Resource kinds, statuses and registry entries.

use crate::error::Fault;

/// Kind of resource; each kind has its own registry map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Markup,
    Data,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Script,
        ResourceKind::Stylesheet,
        ResourceKind::Markup,
        ResourceKind::Data,
    ];

    /// `Accept` header sent when fetching this kind.
    ///
    /// Scripts are requested as plain text so nothing downstream treats the
    /// body as executable before the script host runs it.
    pub fn accept(self) -> &'static str {
        match self {
            ResourceKind::Script => "text/plain",
            ResourceKind::Stylesheet => "text/css",
            ResourceKind::Markup => "text/html",
            ResourceKind::Data => "application/json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Stylesheet => "stylesheet",
            ResourceKind::Markup => "markup",
            ResourceKind::Data => "data",
        }
    }
}

/// Lifecycle of one resource. Declaration order is the forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceStatus {
    Unregistered,
    Pending,
    Downloading,
    Executing,
    Done,
    Error,
}

impl ResourceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ResourceStatus::Done | ResourceStatus::Error)
    }

    /// Whether an entry in `self` may move to `next`. Terminal states are permanent.
    pub fn can_advance_to(self, next: ResourceStatus) -> bool {
        !self.is_terminal() && next >= self
    }
}

/// Loaded body of a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Json(serde_json::Value),
}

impl Content {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            Content::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Content::Json(v) => Some(v),
            Content::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub url: String,
    pub kind: ResourceKind,
    pub status: ResourceStatus,
    /// Present once `Done`, except for resources registered as already loaded.
    pub content: Option<Content>,
    /// Present once `Error`.
    pub fault: Option<Fault>,
}

impl ResourceEntry {
    pub fn new(kind: ResourceKind, url: impl Into<String>, status: ResourceStatus) -> Self {
        Self {
            url: url.into(),
            kind,
            status,
            content: None,
            fault: None,
        }
    }
}
