//! Data-quality validation tool.
//!
//! Runs rule sets against JSON datasets, reports column statistics and
//! distribution drift, and keeps an append-only log of failed checks. All
//! processing is local; nothing is sent anywhere.

use clap::Parser;
use dqengine::Cli;
use dqengine::commands::execute;
use dqengine_core::logging::init_logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&cli.global.log_options())?;

    // Compile the rule-set schema once up front
    dqengine_core::initialize_rule_schema()?;

    execute(&cli).await
}
