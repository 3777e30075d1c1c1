//! In-memory [`MarkupHost`] for the CLI and tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::MarkupHost;

#[derive(Debug, Default, Clone)]
struct Container {
    markup: String,
    /// Sub-regions in creation order.
    regions: Vec<(String, String)>,
    active: Option<String>,
}

/// Flat set of named containers, each with optional named sub-regions.
#[derive(Debug, Default)]
pub struct Document {
    containers: RwLock<HashMap<String, Container>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let doc = Self::new();
        for id in ids {
            doc.add_container(id);
        }
        doc
    }

    pub fn add_container(&self, id: impl Into<String>) {
        self.containers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id.into())
            .or_default();
    }

    fn read<R>(&self, id: &str, f: impl FnOnce(&Container) -> R) -> Option<R> {
        self.containers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(f)
    }

    fn write(&self, id: &str, f: impl FnOnce(&mut Container)) {
        if let Some(c) = self
            .containers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(id)
        {
            f(c);
        }
    }

    pub fn container_markup(&self, id: &str) -> Option<String> {
        self.read(id, |c| c.markup.clone())
    }

    pub fn region_markup(&self, container: &str, region: &str) -> Option<String> {
        self.read(container, |c| {
            c.regions
                .iter()
                .find(|(id, _)| id == region)
                .map(|(_, markup)| markup.clone())
        })
        .flatten()
    }

    /// Region ids of `container` in creation order.
    pub fn regions(&self, container: &str) -> Vec<String> {
        self.read(container, |c| c.regions.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn active_region(&self, container: &str) -> Option<String> {
        self.read(container, |c| c.active.clone()).flatten()
    }
}

impl MarkupHost for Document {
    fn has_container(&self, id: &str) -> bool {
        self.read(id, |_| ()).is_some()
    }

    fn replace_container(&self, id: &str, markup: &str) {
        self.write(id, |c| {
            c.markup = markup.to_string();
            c.regions.clear();
            c.active = None;
        });
    }

    fn replace_region(&self, container: &str, region: &str, markup: &str) {
        self.write(container, |c| {
            match c.regions.iter_mut().find(|(id, _)| id == region) {
                Some((_, existing)) => *existing = markup.to_string(),
                None => c.regions.push((region.to_string(), markup.to_string())),
            }
        });
    }

    fn activate_region(&self, container: &str, region: &str) {
        self.write(container, |c| c.active = Some(region.to_string()));
    }
}
