//! Configuration model for scpwrap.
//!
//! This module defines the `Config` struct that represents the optional
//! `--config` YAML file and the command-line overrides, and the `Settings`
//! value resolved from it once at startup. It supports forward-compatible
//! YAML parsing (unknown fields are ignored) and built-in template sets.

mod model;
mod operations;
mod settings;
pub mod types;


// Re-export public API
pub use model::Config;
pub use settings::Settings;
pub use types::{DEFAULT_PROGRAM, TemplateOverrides, TemplateSet};
