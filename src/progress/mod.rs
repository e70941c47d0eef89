//! Recognition of scp progress-meter lines.
//!
//! scp's progress meter redraws a single line such as
//!
//! ```text
//! something.tar.gz                    1% 2112KB   2.1MB/s   00:50 ETA\r
//! ```
//!
//! Fields are separated by runs of spaces and the line ends in `\r` (or
//! `\n`). The first five fields are the file name, percentage, transferred
//! size, speed and ETA. Anything after the fifth field is ignored.

/// Number of positional fields in a progress line.
pub const FIELD_COUNT: usize = 5;

/// The five fields of a progress line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressFields<'a> {
    /// File being copied.
    pub name: &'a [u8],
    /// Percentage without the trailing `%`.
    pub percent: &'a [u8],
    /// Amount transferred so far, e.g. `2112KB`.
    pub size: &'a [u8],
    /// Current rate, e.g. `2.1MB/s`.
    pub speed: &'a [u8],
    /// Time remaining (or elapsed, on the final line), e.g. `00:50`.
    pub eta: &'a [u8],
}

impl<'a> ProgressFields<'a> {
    /// Fields in template order: `{0}` name .. `{4}` eta.
    pub fn as_values(&self) -> [&'a [u8]; FIELD_COUNT] {
        [self.name, self.percent, self.size, self.speed, self.eta]
    }
}

/// Classification of a completed stdout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A progress-meter update.
    Progress(ProgressFields<'a>),
    /// Anything else; rendered through the stdout template.
    Plain,
    /// A bare `\n` or `\r`; never rendered.
    Blank,
}

fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\r' | b'\n')
}

/// Classify a completed stdout line.
pub fn classify(line: &[u8]) -> LineKind<'_> {
    if line == b"\n" || line == b"\r" {
        return LineKind::Blank;
    }

    let mut fields: [&[u8]; FIELD_COUNT] = [&[]; FIELD_COUNT];
    let mut found = 0;
    let mut iter = line
        .split(|&b| is_delimiter(b))
        .filter(|field| !field.is_empty());
    while found < FIELD_COUNT {
        match iter.next() {
            Some(field) => {
                fields[found] = field;
                found += 1;
            }
            None => break,
        }
    }

    if found < FIELD_COUNT {
        return LineKind::Plain;
    }

    match fields[1].strip_suffix(b"%") {
        Some(percent) => LineKind::Progress(ProgressFields {
            name: fields[0],
            percent,
            size: fields[2],
            speed: fields[3],
            eta: fields[4],
        }),
        None => LineKind::Plain,
    }
}
