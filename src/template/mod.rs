//! Output templates.
//!
//! This module provides:
//!
//! - **Engine**: parsing and rendering of positional templates
//! - **Escape**: script-string-literal escaping of substituted values
//! - **Placeholders**: translation of user tokens (`%p`, `%s`, ...) to positional form
//!
//! # Template Syntax
//!
//! - `{n}` - Substitutes the n'th value supplied for the event
//! - `\n`, `\r`, `\t` - Newline, carriage return, tab
//! - `\{`, `\\` - Literal `{` and `\`
//!
//! Any other character following `\` is emitted as-is.

mod engine;
mod escape;
mod placeholders;


pub use engine::{Escaping, Slot, Template, TemplateError};
pub use placeholders::translate;
