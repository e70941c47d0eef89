//! Translation of user-facing placeholder tokens.
//!
//! Users write `%f`, `%p`, `%t`, `%s`, `%e` in progress templates, `%s` in
//! stdout/stderr templates and `%c` in the end template. These are rewritten
//! to `{n}` in a single pass before parsing. Unknown `%x` tokens are left alone.

use super::engine::Slot;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z])").expect("placeholder token pattern is valid"));

impl Slot {
    /// Position of the value a user token refers to in this slot, if any.
    pub fn token_index(self, token: char) -> Option<usize> {
        match (self, token) {
            (Slot::Stdout | Slot::Stderr, 's') => Some(0),
            (Slot::Progress, 'f') => Some(0),
            (Slot::Progress, 'p') => Some(1),
            (Slot::Progress, 't') => Some(2),
            (Slot::Progress, 's') => Some(3),
            (Slot::Progress, 'e') => Some(4),
            (Slot::End, 'c') => Some(0),
            _ => None,
        }
    }
}

/// Rewrite user tokens in `source` to positional placeholders for `slot`.
pub fn translate(slot: Slot, source: &str) -> String {
    TOKEN
        .replace_all(source, |caps: &Captures<'_>| {
            let token = caps[1].chars().next().unwrap_or_default();
            match slot.token_index(token) {
                Some(index) => format!("{{{}}}", index),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_tokens_map_to_field_positions() {
        assert_eq!(
            translate(Slot::Progress, "%f %p %t %s %e"),
            "{0} {1} {2} {3} {4}"
        );
    }

    #[test]
    fn text_token_means_different_things_per_slot() {
        assert_eq!(translate(Slot::Stdout, "out: %s"), "out: {0}");
        assert_eq!(translate(Slot::Stderr, "err: %s"), "err: {0}");
        assert_eq!(translate(Slot::Progress, "speed %s"), "speed {3}");
    }

    #[test]
    fn end_template_uses_exit_code_token() {
        assert_eq!(
            translate(Slot::End, "ui.stopScpProgress(%c);\n"),
            "ui.stopScpProgress({0});\n"
        );
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        assert_eq!(translate(Slot::Stdout, "%p %c %s"), "%p %c {0}");
        assert_eq!(translate(Slot::Start, "100%s done"), "100%s done");
        assert_eq!(translate(Slot::Progress, "50% %%"), "50% %%");
    }

    #[test]
    fn substituted_placeholders_are_not_retranslated() {
        // A single pass means "{3}" produced for %s is never rescanned.
        assert_eq!(translate(Slot::Progress, "%s%f"), "{3}{0}");
    }
}
