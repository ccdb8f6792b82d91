//! Text output formatter for human-readable display
//!
//! This module provides:
//! - `old -> new` lines for bumped specifiers, bare lines for unchanged ones
//! - `failed {spec} with {error}` lines for failures
//! - Dry-run notes for manifests that would have been rewritten

use crate::domain::BumpOutcome;
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputConfig;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            dry_run: config.dry_run,
            color: config.color,
        }
    }

    /// Render one outcome without a trailing newline
    pub fn render_outcome(&self, outcome: &BumpOutcome) -> String {
        if !self.color {
            return outcome.to_string();
        }
        match outcome {
            BumpOutcome::Changed { old, new, .. } => {
                format!("{} {} {}", old, "->".dimmed(), new.green().bold())
            }
            BumpOutcome::Unchanged { spec, .. } => spec.dimmed().to_string(),
            BumpOutcome::Failed { spec, error, .. } => {
                format!("{} {} with {}", "failed".red().bold(), spec, error)
            }
        }
    }

    /// Write the result: outcomes to `out`, failures and errors to `err`
    pub fn format(
        &self,
        result: &OrchestratorResult,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> std::io::Result<()> {
        for outcome in &result.outcomes {
            let line = self.render_outcome(outcome);
            if outcome.is_failed() {
                writeln!(err, "{}", line)?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }

        for error in &result.errors {
            if self.color {
                writeln!(err, "{} {}", "error:".red().bold(), error)?;
            } else {
                writeln!(err, "error: {}", error)?;
            }
        }

        if self.dry_run {
            for write in result.write_results.iter().filter(|w| w.has_updates()) {
                let prefix = if self.color {
                    "(dry-run)".cyan().to_string()
                } else {
                    "(dry-run)".to_string()
                };
                writeln!(out, "{} {} not written", prefix, write.path.display())?;
            }
        }

        Ok(())
    }
}
