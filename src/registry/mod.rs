//! Registry adapters for fetching package version information
//!
//! This module provides:
//! - HTTP client shared foundation (single attempt, no retries)
//! - A streaming scanner for the text of HTML anchors
//! - PyPI-style simple index adapter
//! - npm Registry adapter
//! - Candidate set construction from raw version tokens

mod anchor;
mod candidates;
mod client;
mod npm;
mod simple_index;

pub use anchor::{anchor_texts, collect_text_under, Markup, MarkupScanner};
pub use candidates::candidate_set;
pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use npm::{NpmAdapter, DEFAULT_NPM_REGISTRY};
pub use simple_index::{version_token_from_filename, SimpleIndexAdapter, DEFAULT_INDEX_URL};

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::update::VersionInfo;
use async_trait::async_trait;
use tracing::debug;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the ecosystem this adapter handles
    fn ecosystem(&self) -> Ecosystem;

    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the raw version tokens listed for a package
    async fn fetch_tokens(&self, package: &str) -> Result<Vec<String>, RegistryError>;

    /// Fetch the candidate set for a package, newest first
    async fn fetch_candidates(
        &self,
        package: &str,
        allow_prerelease: bool,
    ) -> Result<Vec<VersionInfo>, RegistryError> {
        let tokens = self.fetch_tokens(package).await?;
        let candidates = candidate_set(&tokens, allow_prerelease);
        debug!(
            "{} candidates for {} from {} ({} tokens)",
            candidates.len(),
            package,
            self.registry_name(),
            tokens.len()
        );
        Ok(candidates)
    }
}

/// Create a registry adapter for the given ecosystem
pub fn create_adapter(
    ecosystem: Ecosystem,
    client: HttpClient,
    registry_url: &str,
) -> Box<dyn RegistryAdapter> {
    match ecosystem {
        Ecosystem::Python => Box::new(SimpleIndexAdapter::new(client, registry_url)),
        Ecosystem::JavaScript => Box::new(NpmAdapter::new(client, registry_url)),
    }
}
