//! Configuration types and defaults for scpwrap.
//!
//! This module defines the built-in template sets and the per-slot
//! override table shared by the config file and the command line.

use crate::template::Slot;
use serde::Deserialize;

/// Program run when none is configured.
pub const DEFAULT_PROGRAM: &str = "scp";

/// Built-in template set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateSet {
    /// Plain text: only progress percentages are printed.
    #[default]
    Text,
    /// JavaScript statements driving a `ui` object; values are escaped.
    Script,
}

impl TemplateSet {
    /// Built-in template for `slot`, written with user placeholder tokens.
    pub fn template(self, slot: Slot) -> &'static str {
        match (self, slot) {
            (TemplateSet::Text, Slot::Progress) => "%p\n",
            (TemplateSet::Text, _) => "",
            (TemplateSet::Script, Slot::Start) => "var sp = ui.startScpProgress();\n",
            (TemplateSet::Script, Slot::Stdout) => "ui.addOutput(\"%s\");\n",
            (TemplateSet::Script, Slot::Stderr) => "ui.addOutputError(\"%s\");\n",
            (TemplateSet::Script, Slot::Progress) => {
                "sp.setProgress(\"%f\", %p, \"%t\", \"%s\", \"%e\");\n"
            }
            (TemplateSet::Script, Slot::End) => "ui.stopScpProgress(%c);\n",
        }
    }
}

/// Optional replacement text for each template slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateOverrides {
    pub start: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub progress: Option<String>,
    pub end: Option<String>,
}

impl TemplateOverrides {
    /// The override for `slot`, if one was given.
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Start => self.start.as_deref(),
            Slot::Stdout => self.stdout.as_deref(),
            Slot::Stderr => self.stderr.as_deref(),
            Slot::Progress => self.progress.as_deref(),
            Slot::End => self.end.as_deref(),
        }
    }

    /// Combine two override tables; entries in `other` win.
    pub fn overlay(self, other: TemplateOverrides) -> TemplateOverrides {
        TemplateOverrides {
            start: other.start.or(self.start),
            stdout: other.stdout.or(self.stdout),
            stderr: other.stderr.or(self.stderr),
            progress: other.progress.or(self.progress),
            end: other.end.or(self.end),
        }
    }
}
