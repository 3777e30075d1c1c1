use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use crate::error::ValidationError;
use crate::url_model::strip_public_prefix;

/// Directory filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DirectoryQuery {
    pub feature: Option<String>,
    pub path: String,
    pub public: bool,
}

impl DirectoryQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            feature: None,
            path: path.into(),
            public: false,
        }
    }

    pub fn for_feature(feature: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            feature: Some(feature.into()),
            ..Self::new(path)
        }
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Moves a leading `/public` segment of `path` into the `public` flag and
    /// drops an empty feature filter.
    pub fn canonicalize(self) -> Result<Self, ValidationError> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(ValidationError::MissingPath);
        }
        let (path, stripped) = strip_public_prefix(path);
        Ok(Self {
            feature: self.feature.filter(|f| !f.trim().is_empty()),
            path: path.to_string(),
            public: self.public || stripped,
        })
    }

    /// Present fields as query parameters, sorted by key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(feature) = &self.feature {
            params.push(("feature", feature.clone()));
        }
        params.push(("path", self.path.clone()));
        if self.public {
            params.push(("public", "true".to_string()));
        }
        params
    }

    /// Cache key: `key=value` pairs of [`params`](Self::params), percent-encoded
    /// and joined with `&`.
    pub fn cache_key(&self) -> String {
        self.params()
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}
