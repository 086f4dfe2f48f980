mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.command.is_none() && cli.terms.is_empty() {
        Cli::command().print_long_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = commands::run(&cli).await?;
    output::render(&result, cli.format, cli.pretty)?;

    Ok(ExitCode::SUCCESS)
}
