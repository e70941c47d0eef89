//! Mapping of the child's wait status.

use crate::exit_codes;
use nix::sys::wait::WaitStatus;

/// How the child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Normal exit with this code.
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
    /// Any other wait status.
    Unknown,
}

impl ExitDisposition {
    /// Value passed to the end template: the exit code, or the negated
    /// signal number. `None` means the end template is skipped.
    pub fn end_value(&self) -> Option<String> {
        match self {
            ExitDisposition::Exited(code) => Some(code.to_string()),
            ExitDisposition::Signaled(signal) => Some(format!("-{}", signal)),
            ExitDisposition::Unknown => None,
        }
    }

    /// Exit code for this process: the child's own code after a normal exit,
    /// otherwise a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitDisposition::Exited(code) => *code,
            ExitDisposition::Signaled(_) | ExitDisposition::Unknown => exit_codes::FAILURE,
        }
    }
}

impl From<WaitStatus> for ExitDisposition {
    fn from(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, code) => ExitDisposition::Exited(code),
            WaitStatus::Signaled(_, signal, _) => ExitDisposition::Signaled(signal as i32),
            _ => ExitDisposition::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    #[test]
    fn normal_exit_is_propagated() {
        let disposition = ExitDisposition::from(WaitStatus::Exited(Pid::from_raw(42), 3));
        assert_eq!(disposition, ExitDisposition::Exited(3));
        assert_eq!(disposition.end_value().as_deref(), Some("3"));
        assert_eq!(disposition.exit_code(), 3);
    }

    #[test]
    fn signal_is_negated_and_fails() {
        let status = WaitStatus::Signaled(Pid::from_raw(42), Signal::SIGKILL, false);
        let disposition = ExitDisposition::from(status);
        assert_eq!(disposition, ExitDisposition::Signaled(9));
        assert_eq!(disposition.end_value().as_deref(), Some("-9"));
        assert_eq!(disposition.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn unknown_status_skips_end_template() {
        let status = WaitStatus::StillAlive;
        let disposition = ExitDisposition::from(status);
        assert_eq!(disposition, ExitDisposition::Unknown);
        assert_eq!(disposition.end_value(), None);
        assert_eq!(disposition.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn zero_exit_is_success() {
        let disposition = ExitDisposition::Exited(0);
        assert_eq!(disposition.end_value().as_deref(), Some("0"));
        assert_eq!(disposition.exit_code(), exit_codes::SUCCESS);
    }
}
