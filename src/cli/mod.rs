//! CLI argument parsing for scpwrap.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module only describes the command line; the run itself lives in
//! the `commands` module.

use crate::config::{Config, TemplateOverrides};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

const PLACEHOLDER_HELP: &str = "\
The following placeholders can be used in progress templates:
  %f  filename
  %p  progress amount (0-100)
  %t  transfer size (e.g. \"2112KB\")
  %s  speed (e.g. \"2.1MB/s\")
  %e  ETA (e.g. \"--:--\" or \"05:23\")
The following placeholder can be used in stdout/stderr templates:
  %s  text string
The following placeholder can be used in the endTemplate:
  %c  exit code
Positional placeholders ({0}, {1}, ...) and the escapes \\n \\r \\t \\{ \\\\
are accepted in every template.

Example usage:
  scpwrap --js -- -i identityfile user@host1:file1 user@host2:file2";

/// scpwrap: run scp under a pseudoterminal and report its progress.
///
/// scp only draws its progress meter when its output is a terminal. scpwrap
/// runs scp on a pty, recognises the meter lines and prints each update
/// through a template, one line per update.
#[derive(Parser, Debug)]
#[command(name = "scpwrap")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "scpwrap [OPTIONS] -- <SCP-ARGS>...")]
#[command(after_help = PLACEHOLDER_HELP)]
pub struct Cli {
    /// Use javascript default templates, and javascript-escape output strings.
    #[arg(long)]
    pub js: bool,

    /// Text to display before the first progress template appears.
    #[arg(
        long = "startTemplate",
        visible_alias = "start-template",
        value_name = "TEXT",
        allow_hyphen_values = true
    )]
    pub start_template: Option<String>,

    /// Template to use for unrecognised stdout text.
    #[arg(
        long = "stdoutTemplate",
        visible_alias = "stdout-template",
        value_name = "TEXT",
        allow_hyphen_values = true
    )]
    pub stdout_template: Option<String>,

    /// Template to use for unrecognised stderr text.
    #[arg(
        long = "stderrTemplate",
        visible_alias = "stderr-template",
        value_name = "TEXT",
        allow_hyphen_values = true
    )]
    pub stderr_template: Option<String>,

    /// Template to use for copy progress output.
    #[arg(
        long = "progressTemplate",
        visible_alias = "progress-template",
        value_name = "TEXT",
        allow_hyphen_values = true
    )]
    pub progress_template: Option<String>,

    /// Template to use after the copy completes.
    #[arg(
        long = "endTemplate",
        visible_alias = "end-template",
        value_name = "TEXT",
        allow_hyphen_values = true
    )]
    pub end_template: Option<String>,

    /// YAML file with default flags and templates.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Program to run instead of scp.
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// Increase diagnostic output on stderr (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostics to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Arguments passed to scp unchanged.
    #[arg(last = true, value_name = "SCP-ARGS")]
    pub scp_args: Vec<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Cli::try_parse()
    }

    /// The configuration expressed by the flags alone.
    pub fn to_config(&self) -> Config {
        Config {
            js: self.js,
            program: self.program.clone(),
            templates: TemplateOverrides {
                start: self.start_template.clone(),
                stdout: self.stdout_template.clone(),
                stderr: self.stderr_template.clone(),
                progress: self.progress_template.clone(),
                end: self.end_template.clone(),
            },
        }
    }
}
