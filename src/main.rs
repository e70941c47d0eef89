//! scpwrap: run scp under a pseudoterminal and report its progress through
//! user-defined templates.
//!
//! This is the main entry point for the `scpwrap` CLI. It parses arguments,
//! runs the child, and maps errors and the child's termination to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
mod logging;
pub mod progress;
pub mod stream;
pub mod supervisor;
pub mod template;

use clap::CommandFactory;
use cli::Cli;
use error::WrapError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let _ = err.print();
            let code = if err.use_stderr() {
                exit_codes::FAILURE
            } else {
                exit_codes::SUCCESS
            };
            return ExitCode::from(code as u8);
        }
    };

    match commands::run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("scpwrap: {}", err);

            if matches!(err, WrapError::Usage(_)) {
                println!("{}", Cli::command().render_help());
            }

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
