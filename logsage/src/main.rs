//! logsage CLI entry point.

#![forbid(unsafe_code)]

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use logsage::format::{write_diagnostics, write_suggestion};
use logsage::handoff::{self, SUGGESTION_OUTPUT};
use logsage::{Cli, Pipeline, PipelineError, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logsage: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = cli.load_config()?;
    logging::init(&config.general.log_level, cli.quiet);

    // The only place the process environment is consulted for credentials.
    let api_key = std::env::var(&config.llm.api_key_env).ok();
    let pipeline = Pipeline::from_config(&config, api_key)?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "pipeline ready");

    let report = pipeline
        .run(cli.log_file.as_deref(), cli.log_string.as_deref())
        .await?;
    if report.suggestion.is_fallback() {
        warn!(outcome = %report.suggestion.outcome(), "no AI suggestion; printing fallback");
    }

    if !cli.quiet {
        write_diagnostics(&mut io::stderr().lock(), &report)?;
    }
    write_suggestion(&mut io::stdout().lock(), &report.suggestion, cli.quiet)?;

    if let Some(path) = &cli.github_output {
        handoff::write_step_output(path, SUGGESTION_OUTPUT, report.suggestion.text())
            .map_err(PipelineError::Handoff)?;
    }
    Ok(())
}
