//! Config struct definition.

use super::types::{TemplateOverrides, TemplateSet};
use serde::Deserialize;

/// Configuration for a scpwrap run.
///
/// This struct represents the contents of the optional `--config` YAML file,
/// and is also built from command-line flags. Unknown fields in the YAML are
/// ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Use the script template set and escape substituted values.
    pub js: bool,

    /// Program to run instead of `scp`.
    pub program: Option<String>,

    /// Per-slot template overrides.
    pub templates: TemplateOverrides,
}

impl Config {
    /// The built-in template set this config selects.
    pub fn template_set(&self) -> TemplateSet {
        if self.js {
            TemplateSet::Script
        } else {
            TemplateSet::Text
        }
    }

    /// Layer `other` on top of this config.
    ///
    /// `js` is enabled if either side enables it; `program` and each
    /// template slot take `other`'s value when it has one.
    pub fn overlay(self, other: Config) -> Config {
        Config {
            js: self.js || other.js,
            program: other.program.or(self.program),
            templates: self.templates.overlay(other.templates),
        }
    }
}
