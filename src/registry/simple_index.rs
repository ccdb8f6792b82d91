//! PyPI-style simple index adapter
//!
//! Fetches the HTML listing of a project from `{index_url}/{package}` and
//! reads versions out of the distribution filenames linked there.
//! API endpoint: https://pypi.org/simple/{package}

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::anchor::anchor_texts;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use tracing::debug;

/// Default index URL
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/simple";

/// Archive suffixes, checked in this order; only the first match is removed
const ARCHIVE_SUFFIXES: &[&str] = &[".tar.bz2", ".tar.gz", ".whl", ".zip"];

/// Simple index adapter
pub struct SimpleIndexAdapter {
    client: HttpClient,
    index_url: String,
}

impl SimpleIndexAdapter {
    /// Create a new adapter for the given index
    pub fn new(client: HttpClient, index_url: impl Into<String>) -> Self {
        Self {
            client,
            index_url: index_url.into(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.index_url.trim_end_matches('/'), package)
    }
}

/// Extract the version token from a distribution filename.
///
/// The archive suffix is dropped, the name is split on `-`, and the first
/// part after the project name whose leading dot-segment is numeric is the
/// version. Filenames without such a part carry no version.
pub fn version_token_from_filename(filename: &str) -> Option<&str> {
    let stem = ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))
        .unwrap_or(filename);

    stem.split('-').skip(1).find(|part| {
        let lead = part.split('.').next().unwrap_or(part);
        !lead.is_empty() && lead.chars().all(char::is_numeric)
    })
}

#[async_trait]
impl RegistryAdapter for SimpleIndexAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn registry_name(&self) -> &'static str {
        Ecosystem::Python.registry_name()
    }

    async fn fetch_tokens(&self, package: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(package);
        let html = self
            .client
            .get_text(&url, package, self.registry_name())
            .await?;

        let mut files = anchor_texts(&html);
        files.sort_unstable();
        files.dedup();

        let tokens: Vec<String> = files
            .iter()
            .filter_map(|file| {
                let token = version_token_from_filename(file);
                if token.is_none() {
                    debug!("Skipping {}: no version in filename", file);
                }
                token.map(str::to_string)
            })
            .collect();

        debug!(
            "Found {} version tokens in {} files for package {}",
            tokens.len(),
            files.len(),
            package
        );

        Ok(tokens)
    }
}
