use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wasmbench::{cli::Cli, harness::Harness, report::Reporter};

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = match args.harness_config() {
        Ok(config) => config,
        Err(err) => {
            // Config errors occur before the harness exists; report them the same way
            Reporter::stdout(args.format, 0).fatal(&err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let harness = Harness::with_stdout(config, args.format);
    match harness.run(&args.module_source()) {
        Ok(summary) => {
            tracing::info!(
                benchmarked = summary.results.len(),
                skipped = summary.skipped,
                "benchmarks complete"
            );
            Ok(ExitCode::SUCCESS)
        }
        // Already reported as a single Fatal line
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
