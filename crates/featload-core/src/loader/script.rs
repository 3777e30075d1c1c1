//! Script activation seam.

use crate::error::ExecutionError;

/// Activates downloaded script text.
///
/// The loader fetches scripts as inert text and hands them here so that a
/// fault is captured and attributed to the URL (entry status `Error`) instead
/// of escaping as an unattributed failure. Implementations run on a tokio
/// worker and should return promptly.
pub trait ScriptHost: Send + Sync {
    fn execute(&self, url: &str, source: &str) -> Result<(), ExecutionError>;
}

/// Accepts every script without running it. Used where no script engine is
/// embedded, e.g. the CLI, so that script batches still resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertScriptHost;

impl ScriptHost for InertScriptHost {
    fn execute(&self, url: &str, source: &str) -> Result<(), ExecutionError> {
        tracing::trace!(%url, bytes = source.len(), "script accepted without execution");
        Ok(())
    }
}
