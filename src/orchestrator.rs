//! Bump orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: collect → resolve → rewrite
//! - Concurrent resolution bounded by a semaphore
//! - Dry-run mode support
//! - Error handling with partial continuation: one failed specifier never
//!   stops the others

use crate::cli::{CliArgs, DEFAULT_CONCURRENCY};
use crate::dispatch::Resolver;
use crate::domain::{BumpOutcome, Ecosystem};
use crate::manifest::{
    detect_manifests, load_manifest, ManifestEntry, ManifestFile, ManifestWriter, WriteResult,
};
use crate::registry::HttpClient;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Orchestrator for coordinating the bump workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Resolver shared by every task
    resolver: Resolver,
    /// Semaphore bounding concurrent resolutions
    semaphore: Arc<Semaphore>,
    /// Directory searched for manifests when nothing is given explicitly
    base_dir: PathBuf,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// One outcome per distinct specifier, in first-seen order
    pub outcomes: Vec<BumpOutcome>,
    /// Write results for each manifest
    pub write_results: Vec<WriteResult>,
    /// Errors that are not tied to a single specifier
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any specifier failed or any manifest could not be
    /// processed
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty() || self.outcomes.iter().any(BumpOutcome::is_failed)
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to read or scan a manifest
    ManifestError { path: String, message: String },
    /// Failed to write a manifest
    WriteError { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::ManifestError { path, message } => {
                write!(f, "Failed to process {}: {}", path, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// A distinct specifier to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Job {
    ecosystem: Ecosystem,
    spec: String,
}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments
    pub fn new(args: CliArgs) -> Result<Self, OrchestratorError> {
        let client =
            HttpClient::new().map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?;
        Ok(Self::with_client(args, client))
    }

    /// Create an orchestrator with a custom HTTP client (for testing)
    pub fn with_client(args: CliArgs, client: HttpClient) -> Self {
        let resolver = Resolver::new(client, args.index_url.as_str(), args.npm_registry.as_str());
        let permits = if args.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            args.concurrency
        };

        Self {
            args,
            resolver,
            semaphore: Arc::new(Semaphore::new(permits)),
            base_dir: PathBuf::from("."),
        }
    }

    /// Search `dir` for manifests when no specifiers or files are given
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// The resolver used for every specifier
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Run the bump workflow
    pub async fn run(&self) -> OrchestratorResult {
        let mut errors = Vec::new();

        // Step 1: Collect specifiers from arguments and manifests
        let manifests = self.load_manifests(&mut errors);
        let jobs = self.collect_jobs(&manifests);
        debug!(
            "Resolving {} specifiers from {} manifests",
            jobs.len(),
            manifests.len()
        );

        // Step 2: Resolve every distinct specifier concurrently
        let outcomes = self.resolve_all(&jobs).await;

        // Step 3: Rewrite manifests
        let replacements: HashMap<&str, &str> = outcomes
            .iter()
            .filter_map(|o| o.replacement().map(|new| (o.spec(), new)))
            .collect();
        let writer = ManifestWriter::new(self.args.dry_run);
        let mut write_results = Vec::new();

        for manifest in &manifests {
            let planned: Vec<(&ManifestEntry, &str)> = manifest
                .entries
                .iter()
                .filter_map(|entry| {
                    replacements
                        .get(entry.spec.as_str())
                        .map(|new| (entry, *new))
                })
                .collect();

            match writer.write(&manifest.path, &manifest.content, &planned) {
                Ok(result) => write_results.push(result),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(OrchestratorError::WriteError {
                        path: manifest.path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        OrchestratorResult {
            outcomes,
            write_results,
            errors,
        }
    }

    /// Manifests named on the command line, or detected in the base
    /// directory when nothing was given
    fn manifest_paths(&self) -> Vec<PathBuf> {
        if self.args.files.is_empty() && self.args.specs().is_empty() {
            detect_manifests(&self.base_dir)
        } else {
            self.args.files.clone()
        }
    }

    fn load_manifests(&self, errors: &mut Vec<OrchestratorError>) -> Vec<ManifestFile> {
        let mut manifests = Vec::new();
        for path in self.manifest_paths() {
            match load_manifest(&path) {
                Ok(manifest) => {
                    debug!(
                        "{} specifiers in {}",
                        manifest.entries.len(),
                        manifest.path.display()
                    );
                    manifests.push(manifest);
                }
                Err(e) => {
                    warn!("{}", e);
                    errors.push(OrchestratorError::ManifestError {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        manifests
    }

    /// Distinct specifiers in first-seen order: arguments, then manifests
    fn collect_jobs(&self, manifests: &[ManifestFile]) -> Vec<Job> {
        let specs = self.args.specs().into_iter().chain(
            manifests
                .iter()
                .flat_map(|m| m.entries.iter().map(|e| e.spec.clone())),
        );

        let mut jobs: Vec<Job> = Vec::new();
        for spec in specs {
            let job = Job {
                ecosystem: Ecosystem::detect(&spec),
                spec,
            };
            if !jobs.contains(&job) {
                jobs.push(job);
            }
        }
        jobs
    }

    async fn resolve_all(&self, jobs: &[Job]) -> Vec<BumpOutcome> {
        let mut tasks = JoinSet::new();

        for (index, job) in jobs.iter().cloned().enumerate() {
            let resolver = self.resolver.clone();
            let semaphore = Arc::clone(&self.semaphore);
            let allow_prerelease = self.args.pre_release;

            tasks.spawn(async move {
                // the semaphore is never closed, so a permit always arrives
                let _permit = semaphore.acquire_owned().await.ok();
                let resolved = resolver
                    .resolve(job.ecosystem, &job.spec, allow_prerelease)
                    .await;
                let outcome = match resolved {
                    Ok(new) => BumpOutcome::from_resolution(job.spec, new, job.ecosystem),
                    Err(e) => {
                        debug!("Resolution of {} failed: {}", job.spec, e);
                        BumpOutcome::failed(job.spec, job.ecosystem, e)
                    }
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<BumpOutcome>> = vec![None; jobs.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!("Resolution task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| {
                    BumpOutcome::failed(job.spec.as_str(), job.ecosystem, "resolution task failed")
                })
            })
            .collect()
    }
}
