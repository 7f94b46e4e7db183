//! Parser configuration.

use strum_macros::{Display, EnumIter, EnumString};

/// A single behaviour switch, nameable from configuration files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ParserOption {
    /// Parse as if scripting were disabled: `<noscript>` content becomes
    /// markup instead of raw text.
    ScriptingDisabled,
    /// In "in table body", process stray `caption`/`col`/`colgroup`/`tbody`/
    /// `tfoot`/`thead` start tags with the "in table" rules instead of
    /// ignoring them.
    DisableIgnoreTokenInBodyStartTag,
    /// Honour `/>` on unknown HTML elements by closing them immediately.
    InterpretSelfClosingAnythingElse,
    /// Report control characters and noncharacters found in the input.
    CheckInputStream,
    /// Do not retain parse errors on the returned document.
    DiscardErrors,
}

/// Behaviour switches for one parse.
///
/// ```
/// use quill_html::ParserOptions;
///
/// let options = ParserOptions::default().scripting(false).check_input_stream(true);
/// assert!(!options.scripting_enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was created,
    /// and "disabled" otherwise."
    pub scripting_enabled: bool,
    /// See [`ParserOption::DisableIgnoreTokenInBodyStartTag`].
    pub disable_ignore_token_in_body_start_tag: bool,
    /// See [`ParserOption::InterpretSelfClosingAnythingElse`].
    pub interpret_self_closing_anything_else: bool,
    /// See [`ParserOption::CheckInputStream`].
    pub check_input_stream: bool,
    /// Keep parse errors on the result. Errors are still logged and passed to
    /// a registered handler when this is off.
    pub keep_errors: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            disable_ignore_token_in_body_start_tag: false,
            interpret_self_closing_anything_else: false,
            check_input_stream: false,
            keep_errors: true,
        }
    }
}

impl ParserOptions {
    /// Defaults with each named flag applied.
    #[must_use]
    pub fn from_flags(flags: &[ParserOption]) -> Self {
        flags
            .iter()
            .fold(Self::default(), |options, &flag| options.with(flag))
    }

    /// Apply one named flag.
    #[must_use]
    pub const fn with(mut self, flag: ParserOption) -> Self {
        match flag {
            ParserOption::ScriptingDisabled => self.scripting_enabled = false,
            ParserOption::DisableIgnoreTokenInBodyStartTag => {
                self.disable_ignore_token_in_body_start_tag = true;
            }
            ParserOption::InterpretSelfClosingAnythingElse => {
                self.interpret_self_closing_anything_else = true;
            }
            ParserOption::CheckInputStream => self.check_input_stream = true,
            ParserOption::DiscardErrors => self.keep_errors = false,
        }
        self
    }

    /// Set the scripting flag.
    #[must_use]
    pub const fn scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Enable or disable input stream validation.
    #[must_use]
    pub const fn check_input_stream(mut self, enabled: bool) -> Self {
        self.check_input_stream = enabled;
        self
    }

    /// Keep or drop parse errors on the result.
    #[must_use]
    pub const fn keep_errors(mut self, keep: bool) -> Self {
        self.keep_errors = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn flag_names_round_trip_through_strings() {
        for flag in ParserOption::iter() {
            assert_eq!(ParserOption::from_str(&flag.to_string()), Ok(flag));
        }
        assert_eq!(
            ParserOption::from_str("scripting-disabled"),
            Ok(ParserOption::ScriptingDisabled)
        );
    }

    #[test]
    fn from_flags_toggles_independently() {
        let options = ParserOptions::from_flags(&[
            ParserOption::ScriptingDisabled,
            ParserOption::InterpretSelfClosingAnythingElse,
        ]);
        assert!(!options.scripting_enabled);
        assert!(options.interpret_self_closing_anything_else);
        assert!(!options.disable_ignore_token_in_body_start_tag);
        assert!(options.keep_errors);
    }
}
