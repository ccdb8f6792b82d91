//! Process-wide "using index" banner cache
//!
//! Created once at startup and shared by every resolution. Each
//! (ecosystem, registry URL) pair is announced at most once; entries are
//! never evicted. Python and JavaScript keys live behind separate locks so
//! the two ecosystems never wait on each other.

use crate::domain::Ecosystem;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Write-once-per-key record of announced registries
#[derive(Debug, Default)]
pub struct BannerCache {
    python: Mutex<HashSet<String>>,
    javascript: Mutex<HashSet<String>>,
}

impl BannerCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, ecosystem: Ecosystem) -> MutexGuard<'_, HashSet<String>> {
        let slot = match ecosystem {
            Ecosystem::Python => &self.python,
            Ecosystem::JavaScript => &self.javascript,
        };
        // the set stays consistent even if a holder panicked mid-insert
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Announce the registry in use for an ecosystem.
    ///
    /// Returns true if this call logged the banner. The check, the log line
    /// and the insert happen under the ecosystem's lock.
    pub fn announce(&self, ecosystem: Ecosystem, url: &str) -> bool {
        let mut seen = self.lock(ecosystem);
        if seen.contains(url) {
            return false;
        }
        info!("Using {} index: {}", ecosystem.display_name(), url);
        seen.insert(url.to_string())
    }

    /// Returns true if the pair has already been announced
    pub fn contains(&self, ecosystem: Ecosystem, url: &str) -> bool {
        self.lock(ecosystem).contains(url)
    }

    /// Number of announced (ecosystem, URL) pairs
    pub fn len(&self) -> usize {
        Ecosystem::all()
            .iter()
            .map(|&ecosystem| self.lock(ecosystem).len())
            .sum()
    }

    /// Returns true if nothing has been announced yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
