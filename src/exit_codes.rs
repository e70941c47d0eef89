//! Exit code constants for scpwrap.
//!
//! When the child exits normally its own code is propagated unchanged, so
//! these only cover the cases where scpwrap decides the code itself:
//! - 0: Success (`--help`, `--version`)
//! - 1: Failure (bad usage, startup failure, child killed by a signal)
//! - 2: Exec failure, used by the forked child when the program cannot run

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Usage error, fatal system-call failure, or a child that did not exit normally.
pub const FAILURE: i32 = 1;

/// Status the forked child exits with when `execvp` fails.
pub const EXEC_FAILURE: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, FAILURE, EXEC_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_match_convention() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(FAILURE, 1);
        assert_eq!(EXEC_FAILURE, 2);
    }
}
