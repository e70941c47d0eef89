//! Template parsing and rendering.

use super::escape::escape_script;
use std::fmt;

/// The run event a template is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Emitted once, before the first progress update.
    Start,
    /// An ordinary line of child stdout.
    Stdout,
    /// A line of child stderr.
    Stderr,
    /// A recognised progress update.
    Progress,
    /// The child has terminated.
    End,
}

impl Slot {
    /// Number of values supplied when this slot is rendered.
    pub fn arity(self) -> usize {
        match self {
            Slot::Start => 0,
            Slot::Stdout | Slot::Stderr | Slot::End => 1,
            Slot::Progress => 5,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Start => write!(f, "start"),
            Slot::Stdout => write!(f, "stdout"),
            Slot::Stderr => write!(f, "stderr"),
            Slot::Progress => write!(f, "progress"),
            Slot::End => write!(f, "end"),
        }
    }
}

/// How substituted values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Values are written byte for byte.
    #[default]
    Verbatim,
    /// Values are escaped for embedding in a script string literal.
    Script,
}

/// Error type for template parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A character other than a digit or `}` appeared inside `{...}`.
    InvalidPlaceholder {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// A `{` was never closed.
    UnterminatedPlaceholder {
        /// Byte offset of the opening `{`.
        position: usize,
    },
    /// A placeholder refers to a value the event never supplies.
    IndexOutOfRange {
        /// Byte offset of the opening `{`.
        position: usize,
        /// The index written in the template.
        index: usize,
        /// Number of values the event supplies.
        arity: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::InvalidPlaceholder { position, found } => write!(
                f,
                "unexpected '{}' inside placeholder at position {}",
                found, position
            ),
            TemplateError::UnterminatedPlaceholder { position } => {
                write!(f, "unterminated '{{' at position {}", position)
            }
            TemplateError::IndexOutOfRange {
                position,
                index,
                arity,
            } => match arity {
                0 => write!(
                    f,
                    "placeholder {{{}}} at position {} but this template takes no values",
                    index, position
                ),
                _ => write!(
                    f,
                    "placeholder {{{}}} at position {} is out of range (0..={})",
                    index,
                    position,
                    arity - 1
                ),
            },
        }
    }
}

impl std::error::Error for TemplateError {}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Text with escape sequences already decoded.
    Literal(String),
    /// Reference to the n'th value.
    Value(usize),
}

/// A parsed template, bound to the number of values it will be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    arity: usize,
}

impl Template {
    /// Parse a positional template.
    ///
    /// Every `{n}` must satisfy `n < arity`, so rendering with `arity` values
    /// never reads past the end of the value list.
    pub fn parse(source: &str, arity: usize) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, 'n')) => literal.push('\n'),
                    Some((_, 'r')) => literal.push('\r'),
                    Some((_, 't')) => literal.push('\t'),
                    Some((_, other)) => literal.push(other),
                    // trailing backslash
                    None => literal.push('\\'),
                },
                '{' => {
                    let index = parse_index(&mut chars, pos)?;
                    if index >= arity {
                        return Err(TemplateError::IndexOutOfRange {
                            position: pos,
                            index,
                            arity,
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Value(index));
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments, arity })
    }

    /// Parse a template for the given slot, using the slot's arity.
    pub fn for_slot(slot: Slot, source: &str) -> Result<Self, TemplateError> {
        Self::parse(source, slot.arity())
    }

    /// Number of values this template expects.
    #[cfg(test)]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Render the template into `out`.
    ///
    /// `values` must hold exactly as many entries as the arity given to
    /// [`Template::parse`].
    pub fn render_into(&self, values: &[&[u8]], escaping: Escaping, out: &mut Vec<u8>) {
        debug_assert_eq!(values.len(), self.arity, "value count must match arity");

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.extend_from_slice(text.as_bytes()),
                Segment::Value(index) => {
                    let value = values.get(*index).copied().unwrap_or_default();
                    match escaping {
                        Escaping::Verbatim => out.extend_from_slice(value),
                        Escaping::Script => escape_script(value, out),
                    }
                }
            }
        }
    }

    /// Render the template to a new buffer.
    #[cfg(test)]
    pub fn render(&self, values: &[&[u8]], escaping: Escaping) -> Vec<u8> {
        let mut out = Vec::new();
        self.render_into(values, escaping, &mut out);
        out
    }
}

/// Consume the digits of a placeholder up to and including its `}`.
fn parse_index(
    chars: &mut std::str::CharIndices<'_>,
    open: usize,
) -> Result<usize, TemplateError> {
    let mut index: usize = 0;
    loop {
        match chars.next() {
            Some((_, '}')) => return Ok(index),
            Some((_, digit @ '0'..='9')) => {
                let value = digit as usize - '0' as usize;
                index = index.saturating_mul(10).saturating_add(value);
            }
            Some((position, found)) => {
                return Err(TemplateError::InvalidPlaceholder { position, found });
            }
            None => return Err(TemplateError::UnterminatedPlaceholder { position: open }),
        }
    }
}
