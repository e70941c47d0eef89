//! Error types for scpwrap.
//!
//! Uses thiserror for derive macros. Every variant is fatal: `main` prints it
//! to stderr and exits with the code from [`WrapError::exit_code`].

use crate::exit_codes;
use crate::template::{Slot, TemplateError};
use thiserror::Error;

/// Main error type for scpwrap operations.
#[derive(Error, Debug)]
pub enum WrapError {
    /// Invalid command-line usage (e.g. no arguments after `--`).
    #[error("{0}")]
    Usage(String),

    /// The configuration file could not be read, parsed, or validated.
    #[error("{0}")]
    Config(String),

    /// A template contains malformed placeholder syntax.
    #[error("invalid {slot} template: {source}")]
    Template {
        slot: Slot,
        #[source]
        source: TemplateError,
    },

    /// Pseudoterminal or pipe allocation failed.
    #[error("pty setup failed: {0}")]
    Pty(String),

    /// Forking the child process failed.
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// The readiness wait failed.
    #[error("poll failed: {0}")]
    Poll(String),

    /// Waiting for the child to terminate failed.
    #[error("waitpid failed: {0}")]
    Wait(String),

    /// Writing rendered text to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl WrapError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrapError::Usage(_)
            | WrapError::Config(_)
            | WrapError::Template { .. }
            | WrapError::Pty(_)
            | WrapError::Spawn(_)
            | WrapError::Poll(_)
            | WrapError::Wait(_)
            | WrapError::Output(_) => exit_codes::FAILURE,
        }
    }
}

/// Result type alias for scpwrap operations.
pub type Result<T> = std::result::Result<T, WrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_has_failure_exit_code() {
        let err = WrapError::Usage("missing scp arguments".to_string());
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn system_errors_have_failure_exit_code() {
        let errors = [
            WrapError::Pty("no ptys".to_string()),
            WrapError::Spawn("EAGAIN".to_string()),
            WrapError::Poll("EBADF".to_string()),
            WrapError::Wait("ECHILD".to_string()),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), exit_codes::FAILURE);
        }
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = WrapError::Pty("out of ptys".to_string());
        assert_eq!(err.to_string(), "pty setup failed: out of ptys");

        let err = WrapError::Template {
            slot: Slot::Progress,
            source: TemplateError::InvalidPlaceholder {
                position: 3,
                found: 'x',
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid progress template: unexpected 'x' inside placeholder at position 3"
        );
    }

    #[test]
    fn io_errors_convert_to_output_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: WrapError = io.into();
        assert!(matches!(err, WrapError::Output(_)));
        assert_eq!(err.exit_code(), exit_codes::FAILURE);
    }
}
