//! Resolved, immutable run settings.

use super::model::Config;
use super::types::{DEFAULT_PROGRAM, TemplateSet};
use crate::error::{Result, WrapError};
use crate::template::{Escaping, Slot, Template, translate};
use tracing::debug;

/// Everything the supervisor needs, fixed before the child starts.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Program name; also passed to the child as `argv[0]`.
    pub program: String,
    /// Escaping applied to substituted values.
    pub escaping: Escaping,
    start: Template,
    stdout: Template,
    stderr: Template,
    progress: Template,
    end: Template,
}

impl Settings {
    /// Resolve a config into settings.
    ///
    /// Each slot starts from the built-in set chosen by `config.js`, is
    /// replaced by any override, has its user tokens translated, and is
    /// parsed. A malformed template is reported with its slot name.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let set = config.template_set();
        let parse = |slot: Slot| -> Result<Template> {
            let text = config
                .templates
                .get(slot)
                .unwrap_or_else(|| set.template(slot));
            let positional = match slot {
                // The start template has no values, so no tokens to translate.
                Slot::Start => text.to_string(),
                _ => translate(slot, text),
            };
            debug!(%slot, template = %positional, "resolved template");
            Template::for_slot(slot, &positional)
                .map_err(|source| WrapError::Template { slot, source })
        };

        Ok(Self {
            program: config
                .program
                .clone()
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            escaping: match set {
                TemplateSet::Script => Escaping::Script,
                TemplateSet::Text => Escaping::Verbatim,
            },
            start: parse(Slot::Start)?,
            stdout: parse(Slot::Stdout)?,
            stderr: parse(Slot::Stderr)?,
            progress: parse(Slot::Progress)?,
            end: parse(Slot::End)?,
        })
    }

    /// The parsed template for `slot`.
    pub fn template(&self, slot: Slot) -> &Template {
        match slot {
            Slot::Start => &self.start,
            Slot::Stdout => &self.stdout,
            Slot::Stderr => &self.stderr,
            Slot::Progress => &self.progress,
            Slot::End => &self.end,
        }
    }

    /// Render `slot` with `values` using the configured escaping.
    pub fn render_into(&self, slot: Slot, values: &[&[u8]], out: &mut Vec<u8>) {
        self.template(slot).render_into(values, self.escaping, out);
    }
}
