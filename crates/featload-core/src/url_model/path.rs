/// Path prefix that marks an extension point served without authentication.
pub const PUBLIC_PREFIX: &str = "/public";

/// Splits a leading `/public` segment off `path`.
///
/// Returns the remaining path and whether the prefix was present. Only a whole
/// segment matches: `/publications` is not public.
pub fn strip_public_prefix(path: &str) -> (&str, bool) {
    match path.strip_prefix(PUBLIC_PREFIX) {
        Some("") => ("/", true),
        Some(rest) if rest.starts_with('/') => (rest, true),
        _ => (path, false),
    }
}

/// Extension of the last path segment, without the dot.
pub fn filename_extension(name: &str) -> Option<&str> {
    let last = name.rsplit('/').next().unwrap_or(name);
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}
