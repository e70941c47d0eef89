//! Rendering of run events to the output sink.

use super::exit::ExitDisposition;
use crate::config::Settings;
use crate::progress::{LineKind, classify};
use crate::stream::{Channel, CompletedLine};
use crate::template::Slot;
use std::io::{self, Write};
use tracing::trace;

/// Turns completed lines and the final exit status into template output.
///
/// The start template is written at most once, immediately before the
/// first progress update. The sink is flushed after every event.
pub struct Emitter<'s, W: Write> {
    settings: &'s Settings,
    out: W,
    started: bool,
    scratch: Vec<u8>,
}

impl<'s, W: Write> Emitter<'s, W> {
    pub fn new(settings: &'s Settings, out: W) -> Self {
        Self {
            settings,
            out,
            started: false,
            scratch: Vec::new(),
        }
    }

    /// True once the start template has been written.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Render one completed line.
    pub fn line(&mut self, line: &CompletedLine) -> io::Result<()> {
        let settings = self.settings;
        self.scratch.clear();

        match line.channel {
            Channel::Stdout => match classify(&line.bytes) {
                LineKind::Progress(fields) => {
                    trace!(
                        percent = %String::from_utf8_lossy(fields.percent),
                        "progress update"
                    );
                    if !self.started {
                        self.started = true;
                        settings.render_into(Slot::Start, &[], &mut self.scratch);
                    }
                    settings.render_into(Slot::Progress, &fields.as_values(), &mut self.scratch);
                }
                LineKind::Plain => {
                    trace!(line = ?String::from_utf8_lossy(&line.bytes), "stdout line");
                    settings.render_into(Slot::Stdout, &[line.bytes.as_slice()], &mut self.scratch);
                }
                LineKind::Blank => {}
            },
            Channel::Stderr => {
                trace!(line = ?String::from_utf8_lossy(&line.bytes), "stderr line");
                settings.render_into(Slot::Stderr, &[line.bytes.as_slice()], &mut self.scratch);
            }
        }

        self.out.write_all(&self.scratch)?;
        self.out.flush()
    }

    /// Render the end template for `disposition` and flush.
    pub fn finish(&mut self, disposition: ExitDisposition) -> io::Result<()> {
        if let Some(value) = disposition.end_value() {
            self.scratch.clear();
            self.settings
                .render_into(Slot::End, &[value.as_bytes()], &mut self.scratch);
            self.out.write_all(&self.scratch)?;
        }
        self.out.flush()
    }

    /// Recover the sink.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
