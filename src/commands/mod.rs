//! The scpwrap run: resolve configuration, then supervise the child.

use crate::cli::Cli;
use crate::config::{Config, Settings};
use crate::error::{Result, WrapError};
use crate::logging::init_logging;
use crate::supervisor;
use std::io;
use tracing::{debug, info};

/// Message for a command line with nothing after `--`.
pub const MISSING_SCP_ARGS: &str =
    "You must supply options to 'scp' after the '--' command line-argument";

/// Execute a parsed command line.
///
/// Returns the exit code for this process: the child's code after a normal
/// exit, otherwise a failure.
pub fn run(cli: Cli) -> Result<i32> {
    if cli.scp_args.is_empty() {
        return Err(WrapError::Usage(MISSING_SCP_ARGS.to_string()));
    }

    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = resolve_settings(&cli)?;
    debug!(program = %settings.program, escaping = ?settings.escaping, "settings resolved");

    let stdout = io::stdout().lock();
    let disposition = supervisor::run(&settings, &cli.scp_args, stdout)?;
    info!(?disposition, "run complete");

    Ok(disposition.exit_code())
}

/// Layer the flags over the optional config file and parse the templates.
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            Config::load(path)?
        }
        None => Config::default(),
    };

    Settings::from_config(&file.overlay(cli.to_config()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Slot;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scpwrap").chain(args.iter().copied())).unwrap()
    }

    fn render(settings: &Settings, slot: Slot, values: &[&[u8]]) -> String {
        let mut out = Vec::new();
        settings.render_into(slot, values, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn missing_scp_args_is_a_usage_error() {
        let err = run(parse(&["--js"])).unwrap_err();
        assert!(matches!(&err, WrapError::Usage(msg) if msg == MISSING_SCP_ARGS));
        assert_eq!(err.exit_code(), crate::exit_codes::FAILURE);
    }

    #[test]
    fn separator_without_scp_args_is_a_usage_error() {
        let err = run(parse(&["--"])).unwrap_err();
        assert!(matches!(err, WrapError::Usage(_)));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "program: myscp\ntemplates:\n  progress: \"file %p\\n\"\n  end: \"file-end %c\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--config", &path, "--endTemplate", "cli-end %c", "--", "x"]);
        let settings = resolve_settings(&cli).unwrap();

        assert_eq!(settings.program, "myscp");
        assert_eq!(
            render(&settings, Slot::Progress, &[b"f", b"7", b"t", b"s", b"e"]),
            "file 7\n"
        );
        assert_eq!(render(&settings, Slot::End, &[b"0"]), "cli-end 0");
    }

    #[test]
    fn js_from_config_file_selects_script_set() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "js: true").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--config", &path, "--", "x"]);
        let settings = resolve_settings(&cli).unwrap();

        assert_eq!(render(&settings, Slot::End, &[b"0"]), "ui.stopScpProgress(0);\n");
    }

    #[test]
    fn override_wins_over_js_set() {
        let cli = parse(&["--endTemplate", "E%c", "--js", "--", "x"]);
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(render(&settings, Slot::End, &[b"4"]), "E4");
    }

    #[test]
    fn default_program_is_scp() {
        let settings = resolve_settings(&parse(&["--", "x"])).unwrap();
        assert_eq!(settings.program, "scp");
    }

    #[test]
    fn empty_program_flag_is_rejected() {
        let err = resolve_settings(&parse(&["--program", "", "--", "x"])).unwrap_err();
        assert!(matches!(err, WrapError::Config(_)));
    }

    #[test]
    fn malformed_template_flag_is_rejected() {
        let err = resolve_settings(&parse(&["--progressTemplate", "{9}", "--", "x"])).unwrap_err();
        assert!(matches!(
            err,
            WrapError::Template {
                slot: Slot::Progress,
                ..
            }
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err =
            resolve_settings(&parse(&["--config", "/nonexistent/scpwrap.yaml", "--", "x"]))
                .unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
