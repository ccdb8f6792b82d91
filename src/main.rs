//! bump-deps-index - bump dependency specifiers to the latest index versions
//!
//! Specifiers come from the command line or from manifests:
//! - pyproject.toml, tox.ini, setup.cfg
//! - .pre-commit-config.yaml (Python and npm hook dependencies)
//! - requirements*.txt, *.in

use bump_deps_index::cli::CliArgs;
use bump_deps_index::orchestrator::Orchestrator;
use bump_deps_index::output::{OutputConfig, TextFormatter};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;
    tracing::debug!("bump-deps-index v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await;

    let formatter = TextFormatter::new(&OutputConfig::from_cli(args.no_color, args.dry_run));
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    formatter.format(&result, &mut stdout, &mut stderr)?;
    stdout.flush()?;

    if result.has_failures() {
        // Partial success - some specifiers or manifests failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
