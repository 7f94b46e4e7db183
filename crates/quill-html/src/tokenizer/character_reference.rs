//! Character reference states of the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! through [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state).

use super::core::Tokenizer;
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use super::state::TokenizerState;
use super::TokenSink;
use crate::error::ParseErrorCode;
use crate::input::is_noncharacter;

/// [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column."
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Resolve a numeric character reference code to the character it produces,
/// together with the parse error it raises, if any.
#[must_use]
pub fn resolve_numeric_reference(code: u32) -> (char, Option<ParseErrorCode>) {
    match code {
        // "If the number is 0x00, then this is a null-character-reference
        // parse error. Set the character reference code to 0xFFFD."
        0 => ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference)),
        // "If the number is greater than 0x10FFFF, then this is a
        // character-reference-outside-unicode-range parse error."
        c if c > 0x10_FFFF => (
            '\u{FFFD}',
            Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange),
        ),
        // "If the number is a surrogate, then this is a
        // surrogate-character-reference parse error."
        0xD800..=0xDFFF => ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference)),
        c => {
            let Some(ch) = char::from_u32(c) else {
                return ('\u{FFFD}', Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange));
            };
            if is_noncharacter(ch) {
                // "...noncharacter-character-reference parse error." The code
                // point itself is kept.
                return (ch, Some(ParseErrorCode::NoncharacterCharacterReference));
            }
            // "If the number is 0x0D, or a control that's not ASCII
            // whitespace, then this is a control-character-reference parse
            // error."
            let is_control = c <= 0x1F || (0x7F..=0x9F).contains(&c);
            let is_ascii_whitespace = matches!(c, 0x09 | 0x0A | 0x0C | 0x20);
            if c == 0x0D || (is_control && !is_ascii_whitespace) {
                let replaced = C1_REPLACEMENTS
                    .iter()
                    .find(|&&(from, _)| from == c)
                    .map_or(ch, |&(_, to)| to);
                return (replaced, Some(ParseErrorCode::ControlCharacterReference));
            }
            (ch, None)
        }
    }
}

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "consumed as part of an attribute": the return state is one of the
    /// attribute value states.
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise, emit
    /// each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            if let Some(token) = self.current_token.as_mut() {
                for c in buffer.chars() {
                    token.append_to_current_attribute_value(c);
                }
            }
        } else {
            self.emit_characters(&buffer);
        }
    }

    /// Append to the attribute value or emit, depending on where the reference
    /// appeared.
    fn append_or_emit(&mut self, c: char) {
        if self.is_consumed_as_part_of_attribute() {
            if let Some(token) = self.current_token.as_mut() {
                token.append_to_current_attribute_value(c);
            }
        } else {
            self.emit_character_token(c);
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric"
            // "Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#)"
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else"
            // "Flush code points consumed as a character reference. Reconsume
            // in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// The candidate is extended by lookahead only; characters are consumed
    /// once the longest match is known, so nothing past the match is eaten.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let Some(first) = self.current_input_character else {
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let mut candidate = String::from(first);
        let mut longest: Option<(usize, &'static str)> =
            lookup_entity(&candidate).map(|value| (1, value));
        let mut lookahead = 0;
        while any_entity_has_prefix(&candidate) {
            let Some(next) = self.input.peek(lookahead) else {
                break;
            };
            candidate.push(next);
            lookahead += 1;
            if let Some(value) = lookup_entity(&candidate) {
                longest = Some((lookahead + 1, value));
            }
        }

        let Some((match_chars, value)) = longest else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            // Only the ampersand has been consumed; the first name character
            // is handled again by the ambiguous ampersand state.
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let matched: String = candidate.chars().take(match_chars).collect();
        self.input.consume_n(match_chars - 1);
        self.temporary_buffer.push_str(&matched);
        let ends_with_semicolon = matched.ends_with(';');

        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical reasons,
        // flush code points consumed as a character reference and switch to
        // the return state."
        if self.is_consumed_as_part_of_attribute()
            && !ends_with_semicolon
            && self
                .input
                .peek(0)
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(self.return_state);
            return;
        }

        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference
        // parse error."
        if !ends_with_semicolon {
            self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
        }

        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name to the
        // temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(value);
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric"
            Some(c) if c.is_ascii_alphanumeric() => self.append_or_emit(c),
            // "U+003B SEMICOLON (;)"
            // "This is an unknown-named-character-reference parse error.
            // Reconsume in the return state."
            Some(';') => {
                self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                self.reconsume_in_return_state();
            }
            _ => self.reconsume_in_return_state(),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X" / "U+0058 LATIN CAPITAL LETTER X"
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    /// and [§ 13.2.5.77](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_numeric_character_reference_start_state(&mut self, radix: u32) {
        let digits_state = if radix == 16 {
            TokenizerState::HexadecimalCharacterReference
        } else {
            TokenizerState::DecimalCharacterReference
        };
        match self.current_input_character {
            Some(c) if c.is_digit(radix) => self.reconsume_in(digits_state),
            // "This is an absence-of-digits-in-numeric-character-reference
            // parse error. Flush code points consumed as a character
            // reference. Reconsume in the return state."
            _ => {
                self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.78](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    /// and [§ 13.2.5.79](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_numeric_character_reference_digits_state(&mut self, radix: u32) {
        match self.current_input_character {
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or_default();
                // Saturate well above 0x10FFFF; the end state only needs to
                // know the value is out of range.
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(0x0011_0000);
            }
            // "U+003B SEMICOLON: Switch to the numeric character reference end state."
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            // "This is a missing-semicolon-after-character-reference parse
            // error. Reconsume in the numeric character reference end state."
            _ => {
                self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Runs without consuming a character.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let (c, error) = resolve_numeric_reference(self.character_reference_code);
        if let Some(code) = error {
            self.parse_error(code);
        }
        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer.
        // Flush code points consumed as a character reference. Switch to the
        // return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push(c);
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c1_controls_use_windows_1252_mapping() {
        assert_eq!(
            resolve_numeric_reference(0x80),
            ('\u{20AC}', Some(ParseErrorCode::ControlCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0x81),
            ('\u{81}', Some(ParseErrorCode::ControlCharacterReference))
        );
    }

    #[test]
    fn invalid_codes_become_replacement_character() {
        assert_eq!(
            resolve_numeric_reference(0),
            ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0xD800),
            ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0x11_0000),
            (
                '\u{FFFD}',
                Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange)
            )
        );
    }

    #[test]
    fn ordinary_codes_pass_through() {
        assert_eq!(resolve_numeric_reference(0x41), ('A', None));
        assert_eq!(resolve_numeric_reference(0x0A), ('\n', None));
        assert_eq!(
            resolve_numeric_reference(0x0D),
            ('\r', Some(ParseErrorCode::ControlCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0xFFFF),
            ('\u{FFFF}', Some(ParseErrorCode::NoncharacterCharacterReference))
        );
    }
}
