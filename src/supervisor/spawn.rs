//! Child process creation.
//!
//! The child's stdin and stdout are the slave side of a fresh pseudoterminal,
//! which also becomes its controlling terminal, so scp believes it is
//! interactive and draws its progress meter. The child's stderr is a pipe so
//! diagnostics stay separate from the meter.
//!
//! Uses the `nix` crate for the pty, pipe, fork and wait calls. Between fork
//! and exec the child only makes raw `libc` calls on data prepared before the
//! fork.

use super::exit::ExitDisposition;
use crate::error::{Result, WrapError};
use crate::exit_codes;
use nix::errno::Errno;
use nix::pty::{Winsize, openpty};
use nix::sys::wait::waitpid;
use nix::unistd::{ForkResult, Pid, fork, pipe};
use std::ffi::CString;
use std::fs::File;
use std::os::fd::{AsRawFd, RawFd};
use std::os::raw::c_char;
use tracing::{debug, info};

/// Window size reported to the child; scp sizes its meter to the width.
const PTY_COLS: u16 = 80;
const PTY_ROWS: u16 = 24;

/// Read ends of the child's output channels.
#[derive(Debug)]
pub struct ChildStreams {
    /// Master side of the pty carrying the child's stdout.
    pub stdout: File,
    /// Read end of the pipe carrying the child's stderr.
    pub stderr: File,
}

/// A running child that has not been reaped yet.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
}

impl ChildProcess {
    /// The child's process id.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the child terminates and reap it.
    ///
    /// Consumes the handle so the child is reaped exactly once.
    pub fn wait(self) -> Result<ExitDisposition> {
        loop {
            match waitpid(self.pid, None) {
                Ok(status) => {
                    let disposition = ExitDisposition::from(status);
                    info!(pid = %self.pid, ?disposition, "child terminated");
                    return Ok(disposition);
                }
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(WrapError::Wait(e.to_string())),
            }
        }
    }
}

/// Everything the child needs after fork, built while allocation is still safe.
struct ExecPlan {
    program: CString,
    // Keeps the strings behind `argv` alive.
    _args: Vec<CString>,
    argv: Vec<*const c_char>,
}

impl ExecPlan {
    fn new(program: &str, args: &[String]) -> Result<Self> {
        let to_cstring = |s: &str| {
            CString::new(s).map_err(|_| {
                WrapError::Spawn(format!("argument contains a NUL byte: {:?}", s))
            })
        };

        let program_c = to_cstring(program)?;
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(program_c.clone());
        for arg in args {
            all.push(to_cstring(arg)?);
        }

        let argv = all
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        Ok(Self {
            program: program_c,
            _args: all,
            argv,
        })
    }
}

/// Spawn `program` with `args`, its stdout on a pty and its stderr on a pipe.
///
/// `program` is passed to the child as `argv[0]` and looked up in `PATH`.
pub fn spawn(program: &str, args: &[String]) -> Result<(ChildProcess, ChildStreams)> {
    let plan = ExecPlan::new(program, args)?;

    let winsize = Winsize {
        ws_row: PTY_ROWS,
        ws_col: PTY_COLS,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let pty = openpty(&winsize, None)
        .map_err(|e| WrapError::Pty(format!("failed to open pty: {}", e)))?;
    let (stderr_read, stderr_write) =
        pipe().map_err(|e| WrapError::Pty(format!("failed to create stderr pipe: {}", e)))?;

    debug!(program, ?args, "forking child");

    // SAFETY: the child branch only calls async-signal-safe libc functions on
    // memory prepared before the fork, then execs or exits.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            drop(pty.slave);
            drop(stderr_write);
            debug!(pid = %child, "child started");
            Ok((
                ChildProcess { pid: child },
                ChildStreams {
                    stdout: File::from(pty.master),
                    stderr: File::from(stderr_read),
                },
            ))
        }
        Ok(ForkResult::Child) => {
            let fds = ChildFds {
                slave: pty.slave.as_raw_fd(),
                master: pty.master.as_raw_fd(),
                stderr_read: stderr_read.as_raw_fd(),
                stderr_write: stderr_write.as_raw_fd(),
            };
            // SAFETY: we are the single-threaded child of a fork.
            unsafe { exec_child(&plan, &fds) }
        }
        Err(e) => Err(WrapError::Spawn(format!("fork failed: {}", e))),
    }
}

struct ChildFds {
    slave: RawFd,
    master: RawFd,
    stderr_read: RawFd,
    stderr_write: RawFd,
}

/// Wire up the child's descriptors and replace the process image.
///
/// Never returns: on exec failure the reason is written to the new stderr
/// (the pipe, so the parent renders it) and the child exits with
/// [`exit_codes::EXEC_FAILURE`].
unsafe fn exec_child(plan: &ExecPlan, fds: &ChildFds) -> ! {
    unsafe {
        // Rust ignores SIGPIPE; restore the default for the new program.
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);

        libc::setsid();
        libc::ioctl(fds.slave, libc::TIOCSCTTY as _, 0);

        libc::close(fds.master);
        libc::close(fds.stderr_read);

        libc::dup2(fds.slave, libc::STDIN_FILENO);
        libc::dup2(fds.slave, libc::STDOUT_FILENO);
        libc::dup2(fds.stderr_write, libc::STDERR_FILENO);
        if fds.slave > libc::STDERR_FILENO {
            libc::close(fds.slave);
        }
        if fds.stderr_write > libc::STDERR_FILENO {
            libc::close(fds.stderr_write);
        }

        libc::execvp(plan.program.as_ptr(), plan.argv.as_ptr());

        let reason = Errno::last().desc();
        write_stderr(b"execvp: ");
        write_stderr(reason.as_bytes());
        write_stderr(b"\n");
        libc::_exit(exit_codes::EXEC_FAILURE)
    }
}

fn write_stderr(bytes: &[u8]) {
    // SAFETY: writes from a valid buffer to an open descriptor.
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}

