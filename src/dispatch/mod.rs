//! Resolution entry point
//!
//! A [`Resolver`] turns one specifier into its bumped form. It announces the
//! registry in use through the shared [`BannerCache`], then fetches the
//! candidate set and rewrites the specifier. The banner step is the only
//! locked section: fetches for the same ecosystem run concurrently.

mod banner;

pub use banner::BannerCache;

use crate::domain::{Ecosystem, Specifier};
use crate::error::ResolveError;
use crate::registry::{
    create_adapter, HttpClient, RegistryAdapter, DEFAULT_INDEX_URL, DEFAULT_NPM_REGISTRY,
};
use crate::update::{js_package_name, rewrite_js, rewrite_python, select_js, select_python};
use std::sync::Arc;
use tracing::debug;

/// Resolves specifiers against a Python index and an npm registry
#[derive(Clone)]
pub struct Resolver {
    client: HttpClient,
    index_url: String,
    npm_registry: String,
    banner: Arc<BannerCache>,
}

impl Resolver {
    /// Create a resolver with its own banner cache
    pub fn new(
        client: HttpClient,
        index_url: impl Into<String>,
        npm_registry: impl Into<String>,
    ) -> Self {
        Self::with_banner(client, index_url, npm_registry, Arc::new(BannerCache::new()))
    }

    /// Create a resolver that shares an existing banner cache
    pub fn with_banner(
        client: HttpClient,
        index_url: impl Into<String>,
        npm_registry: impl Into<String>,
        banner: Arc<BannerCache>,
    ) -> Self {
        Self {
            client,
            index_url: index_url.into(),
            npm_registry: npm_registry.into(),
            banner,
        }
    }

    /// Resolver against the public PyPI and npm registries
    pub fn with_defaults(client: HttpClient) -> Self {
        Self::new(client, DEFAULT_INDEX_URL, DEFAULT_NPM_REGISTRY)
    }

    /// The banner cache this resolver announces through
    pub fn banner(&self) -> &Arc<BannerCache> {
        &self.banner
    }

    /// Registry URL used for an ecosystem
    pub fn registry_url(&self, ecosystem: Ecosystem) -> &str {
        match ecosystem {
            Ecosystem::Python => &self.index_url,
            Ecosystem::JavaScript => &self.npm_registry,
        }
    }

    /// Adapter for an ecosystem's configured registry
    pub fn adapter(&self, ecosystem: Ecosystem) -> Box<dyn RegistryAdapter> {
        create_adapter(ecosystem, self.client.clone(), self.registry_url(ecosystem))
    }

    /// Resolve a specifier to its bumped form.
    ///
    /// A Python specifier with no acceptable candidate comes back unchanged.
    /// An npm package with no candidates is a [`ResolveError::NoCandidates`].
    pub async fn resolve(
        &self,
        ecosystem: Ecosystem,
        spec: &str,
        allow_prerelease: bool,
    ) -> Result<String, ResolveError> {
        let url = self.registry_url(ecosystem);
        self.banner.announce(ecosystem, url);

        match ecosystem {
            Ecosystem::Python => self.resolve_python(spec, allow_prerelease).await,
            Ecosystem::JavaScript => self.resolve_js(spec, allow_prerelease).await,
        }
    }

    async fn resolve_python(&self, spec: &str, allow_prerelease: bool) -> Result<String, ResolveError> {
        let parsed = Specifier::parse(spec)?;
        let adapter = self.adapter(Ecosystem::Python);
        let candidates = adapter
            .fetch_candidates(&parsed.name, allow_prerelease)
            .await?;

        match select_python(&parsed, &candidates) {
            Some(chosen) => Ok(rewrite_python(&parsed, chosen)?),
            None => {
                debug!("No better version for {}", spec);
                Ok(spec.to_string())
            }
        }
    }

    async fn resolve_js(&self, spec: &str, allow_prerelease: bool) -> Result<String, ResolveError> {
        let package = js_package_name(spec);
        let adapter = self.adapter(Ecosystem::JavaScript);
        let candidates = adapter.fetch_candidates(package, allow_prerelease).await?;

        let chosen = select_js(&candidates)
            .ok_or_else(|| ResolveError::no_candidates(package, adapter.registry_name()))?;
        Ok(rewrite_js(spec, chosen))
    }
}
