//! regbench - regression model selection from the command line

use clap::Parser;
use regression_bench::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regression_bench=info".into()),
        )
        .init();

    run(Cli::parse())
}
