//! Session: owner of the registry and discovery cache, and the entry point
//! that wires loader, injector, discovery and plugin iterator together.

use std::sync::{Arc, Mutex};

use crate::config::{FeatloadConfig, NavbarConfig};
use crate::discovery::{Discovery, DiscoveryCache};
use crate::error::{DiscoveryError, ValidationError};
use crate::injector::{Document, Injector, MarkupHost};
use crate::loader::{InertScriptHost, Loader, ScriptHost};
use crate::navbar::{install_buttons, Navbar};
use crate::plugins::PluginIterator;
use crate::registry::Registry;
use crate::transport::{CurlTransport, Transport};
use crate::url_model;

/// Registries and caches live exactly as long as the session.
#[derive(Clone)]
pub struct Session {
    registry: Arc<Registry>,
    cache: Arc<DiscoveryCache>,
    loader: Loader,
    injector: Injector,
    plugins: PluginIterator,
    navbar: NavbarConfig,
}

impl Session {
    pub fn new(
        cfg: &FeatloadConfig,
        transport: Arc<dyn Transport>,
        scripts: Arc<dyn ScriptHost>,
        markup: Arc<dyn MarkupHost>,
    ) -> Result<Self, ValidationError> {
        let base = url_model::parse_base(&cfg.base_url)?;
        url_model::parse_base(&cfg.endpoint)?;

        let registry = Arc::new(Registry::new());
        let cache = Arc::new(DiscoveryCache::new());
        let loader = Loader::new(
            Arc::clone(&registry),
            Arc::clone(&transport),
            scripts,
            base,
            cfg.poll_interval(),
        );
        let discovery = Discovery::new(cfg.endpoint.trim(), transport, Arc::clone(&cache));
        tracing::debug!(
            base = %cfg.base_url,
            endpoint = %cfg.endpoint,
            poll_ms = cfg.poll_interval().as_millis() as u64,
            "session created"
        );
        Ok(Self {
            registry,
            cache,
            injector: Injector::new(loader.clone(), markup),
            plugins: PluginIterator::new(discovery, loader.clone()),
            loader,
            navbar: cfg.navbar(),
        })
    }

    /// libcurl transport, no script engine and an in-memory document.
    pub fn from_config(cfg: &FeatloadConfig) -> Result<(Self, Arc<Document>), ValidationError> {
        let document = Arc::new(Document::new());
        let session = Self::new(
            cfg,
            Arc::new(CurlTransport::from_config(cfg)),
            Arc::new(InertScriptHost),
            document.clone(),
        )?;
        Ok((session, document))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn discovery_cache(&self) -> &Arc<DiscoveryCache> {
        &self.cache
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    pub fn plugins(&self) -> &PluginIterator {
        &self.plugins
    }

    pub fn discovery(&self) -> &Discovery {
        self.plugins.discovery()
    }

    /// Empty navbar with the configured order and home feature.
    pub fn navbar(&self) -> Navbar {
        Navbar::from_config(&self.navbar)
    }

    /// Runs [`install_buttons`] against the configured descriptor path.
    pub async fn install_navbar(&self, navbar: Arc<Mutex<Navbar>>) -> Result<usize, DiscoveryError> {
        install_buttons(&self.plugins, &self.injector, navbar, &self.navbar.descriptor_path).await
    }
}
