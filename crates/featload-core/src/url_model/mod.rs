//! URL canonicalization for registry keys and directory hrefs.
//!
//! Every resource URL is resolved against the page base URL and normalized
//! (scheme/host case, dot segments, default port) so that different spellings
//! of the same location share one registry entry.

mod path;

pub use path::{filename_extension, strip_public_prefix, PUBLIC_PREFIX};

use url::Url;

use crate::error::ValidationError;

/// Parse the configured base URL.
pub fn parse_base(base: &str) -> Result<Url, ValidationError> {
    Url::parse(base.trim()).map_err(|e| ValidationError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves `input` against `base` and returns its canonical string form.
///
/// Absolute inputs are only normalized; relative inputs (`js/app.js`,
/// `../x.html`, `/v1/a.json`) are joined to `base` first.
///
/// # Examples
///
/// - `canonicalize(http://h/app/, "js/a.js")` → `"http://h/app/js/a.js"`
/// - `canonicalize(_, "HTTP://H:80/a/./b/../c.js")` → `"http://h/a/c.js"`
pub fn canonicalize(base: &Url, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    let resolved = match Url::parse(trimmed) {
        Ok(u) => u,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(trimmed).map_err(|e| {
            ValidationError::InvalidUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            }
        })?,
        Err(e) => {
            return Err(ValidationError::InvalidUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            })
        }
    };
    Ok(resolved.to_string())
}

/// Appends a directory-relative `href` to the service endpoint.
///
/// Hrefs from the directory service are endpoint-relative paths
/// (`/html5/features/<feature>/<path>`), so this is a plain join that avoids
/// doubling the slash at the seam.
pub fn join_endpoint(endpoint: &str, href: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{endpoint}{href}")
    } else {
        format!("{endpoint}/{href}")
    }
}
