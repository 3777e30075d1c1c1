//! Resource registry.
//!
//! Pure state: per-kind map from canonical URL to load status and, once
//! loaded, content. It answers "has this URL ever been requested, and what
//! state is it in" for every load request. No network or UI side effects.
//!
//! The registry lives as long as the [`Session`](crate::Session) that owns it;
//! there is no teardown, and `Done`/`Error` entries never change again.

mod entry;
mod state;

pub use entry::{Content, ResourceEntry, ResourceKind, ResourceStatus};
pub use state::Registry;
