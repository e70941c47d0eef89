//! Child supervision.
//!
//! A run moves through these stages:
//!
//! 1. **Spawning**: fork the child with stdout on a pty and stderr on a pipe
//! 2. **Running**: wait for readiness on the open channels, read one byte
//!    from each ready channel and render every line that completes
//! 3. **Draining**: render whatever unterminated bytes remain
//! 4. **Reaped**: wait for the child to terminate
//! 5. **Done**: render the end template
//!
//! Reads are one byte per readiness notification so a line boundary is always
//! seen on the byte that creates it. The child is reaped on every path once it
//! has been spawned, including when the output loop fails.

mod emitter;
mod exit;
mod spawn;


pub use exit::ExitDisposition;

use emitter::Emitter;
use spawn::{ChildStreams, spawn};

use crate::config::Settings;
use crate::error::{Result, WrapError};
use crate::stream::{Channel, DEFAULT_CAPACITY, Reassembler};
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsFd;
use tracing::{debug, info};

/// Run `settings.program` with `args` and render its output to `out`.
///
/// Returns how the child terminated; the caller turns that into this
/// process's exit code.
pub fn run<W: Write>(settings: &Settings, args: &[String], out: W) -> Result<ExitDisposition> {
    let (child, streams) = spawn(&settings.program, args)?;
    info!(program = %settings.program, pid = %child.pid(), "supervising child");

    let mut emitter = Emitter::new(settings, out);
    let pumped = pump(streams, &mut emitter);
    debug!(progress_seen = emitter.started(), "child output closed");

    // Reap even if the output loop failed; the streams are closed by now.
    let disposition = child.wait()?;
    pumped?;

    emitter.finish(disposition)?;
    Ok(disposition)
}

/// Which channels are still open.
#[derive(Debug, Clone, Copy)]
struct OpenChannels {
    stdout: bool,
    stderr: bool,
}

impl OpenChannels {
    fn any(&self) -> bool {
        self.stdout || self.stderr
    }
}

/// Drive the Running and Draining stages until both channels have closed.
///
/// Consumes the streams so they are closed on return.
fn pump<W: Write>(streams: ChildStreams, emitter: &mut Emitter<'_, W>) -> Result<()> {
    let mut reassembler = Reassembler::with_capacity(DEFAULT_CAPACITY);
    let mut open = OpenChannels {
        stdout: true,
        stderr: true,
    };

    while open.any() {
        let ready = wait_readable(&streams, open)?;

        if ready.stderr {
            match read_byte(&streams.stderr) {
                Some(byte) => {
                    for line in reassembler.feed(Channel::Stderr, &[byte]) {
                        emitter.line(&line)?;
                    }
                }
                None => {
                    debug!("child stderr closed");
                    open.stderr = false;
                }
            }
        }

        if ready.stdout {
            match read_byte(&streams.stdout) {
                Some(byte) => {
                    for line in reassembler.feed(Channel::Stdout, &[byte]) {
                        emitter.line(&line)?;
                    }
                }
                None => {
                    debug!("child stdout closed");
                    open.stdout = false;
                }
            }
        }
    }

    for channel in [Channel::Stderr, Channel::Stdout] {
        if let Some(line) = reassembler.finish(channel) {
            debug!(%channel, len = line.bytes.len(), "flushing residual output");
            emitter.line(&line)?;
        }
    }

    Ok(())
}

/// Block until at least one open channel is readable or has hung up.
fn wait_readable(streams: &ChildStreams, open: OpenChannels) -> Result<OpenChannels> {
    let wanted = [
        (Channel::Stdout, open.stdout, &streams.stdout),
        (Channel::Stderr, open.stderr, &streams.stderr),
    ];

    loop {
        let mut channels = Vec::with_capacity(2);
        let mut fds = Vec::with_capacity(2);
        for (channel, is_open, file) in wanted {
            if is_open {
                channels.push(channel);
                fds.push(PollFd::new(file.as_fd(), PollFlags::POLLIN));
            }
        }

        match poll(&mut fds, PollTimeout::NONE) {
            Ok(_) => {
                let mut ready = OpenChannels {
                    stdout: false,
                    stderr: false,
                };
                for (channel, fd) in channels.iter().zip(&fds) {
                    let readable = fd.revents().is_some_and(|events| {
                        events.intersects(
                            PollFlags::POLLIN
                                | PollFlags::POLLHUP
                                | PollFlags::POLLERR
                                | PollFlags::POLLNVAL,
                        )
                    });
                    match channel {
                        Channel::Stdout => ready.stdout = readable,
                        Channel::Stderr => ready.stderr = readable,
                    }
                }
                return Ok(ready);
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(WrapError::Poll(e.to_string())),
        }
    }
}

/// Read a single byte; `None` means the channel is finished.
///
/// End of file and read errors both end the channel. Reading the pty master
/// fails with `EIO` once the child side has closed, which is the normal end
/// of the stdout channel.
fn read_byte(mut file: &File) -> Option<u8> {
    let mut byte = [0u8; 1];
    loop {
        match file.read(&mut byte) {
            Ok(0) => return None,
            Ok(_) => return Some(byte[0]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "channel read ended");
                return None;
            }
        }
    }
}
