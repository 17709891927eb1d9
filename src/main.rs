use autosort::cli::{Cli, run_cli_with_config};
use autosort::output::OutputFormatter;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    OutputFormatter::set_color(!cli.no_color);

    match run_cli_with_config(cli.command, cli.base.as_deref(), cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
