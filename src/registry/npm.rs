//! npm Registry adapter
//!
//! Fetches package version information from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// npm registry base URL
pub const DEFAULT_NPM_REGISTRY: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    registry_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Available versions, keyed by version string; absent or `null` for
    /// packages that never published
    #[serde(default)]
    versions: Option<HashMap<String, serde_json::Value>>,
}

impl NpmAdapter {
    /// Create a new npm adapter for the given registry
    pub fn new(client: HttpClient, registry_url: impl Into<String>) -> Self {
        Self {
            client,
            registry_url: registry_url.into(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.registry_url.trim_end_matches('/'), package)
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::JavaScript
    }

    fn registry_name(&self) -> &'static str {
        Ecosystem::JavaScript.registry_name()
    }

    async fn fetch_tokens(&self, package: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(response.versions.unwrap_or_default().into_keys().collect())
    }
}
