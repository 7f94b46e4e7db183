//! The input stream feeding the tokenizer.
//!
//! [§ 13.2.3 The input byte stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)

use crate::error::{ParseError, ParseErrorCode};

/// A decoded, newline-normalised character stream with one-step pushback.
///
/// Positions are character offsets into the normalised text.
#[derive(Debug, Clone)]
pub struct InputStream {
    chars: Vec<char>,
    pos: usize,
    /// Set when the last `consume` returned end of input, so a following
    /// `reconsume` replays EOF instead of stepping back over a character.
    consumed_eof: bool,
    check_codepoints: bool,
    /// Everything below this offset has already been validated. Lookahead
    /// and reconsume may revisit an offset; it is only reported once.
    validated_up_to: usize,
    /// Offsets where a lone surrogate was replaced by U+FFFD while decoding.
    surrogate_positions: Vec<usize>,
    pending_errors: Vec<ParseError>,
}

impl InputStream {
    /// Build a stream from decoded text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::from_decoded(text.chars().map(Some))
    }

    /// Build a stream from UTF-16 code units. Lone surrogates become U+FFFD
    /// and are reported as `surrogate-in-input-stream` when consumed.
    #[must_use]
    pub fn from_utf16(units: &[u16]) -> Self {
        Self::from_decoded(char::decode_utf16(units.iter().copied()).map(Result::ok))
    }

    /// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines." `None` items mark lone surrogates.
    fn from_decoded(decoded: impl Iterator<Item = Option<char>>) -> Self {
        let mut chars = Vec::new();
        let mut surrogate_positions = Vec::new();
        let mut after_cr = false;
        for item in decoded {
            match item {
                Some('\r') => {
                    chars.push('\n');
                    after_cr = true;
                    continue;
                }
                Some('\n') if after_cr => {}
                Some(c) => chars.push(c),
                None => {
                    surrogate_positions.push(chars.len());
                    chars.push('\u{FFFD}');
                }
            }
            after_cr = false;
        }
        Self {
            chars,
            pos: 0,
            consumed_eof: false,
            check_codepoints: false,
            validated_up_to: 0,
            surrogate_positions,
            pending_errors: Vec::new(),
        }
    }

    /// Enable reporting of control characters and noncharacters.
    #[must_use]
    pub const fn with_codepoint_checks(mut self, enabled: bool) -> Self {
        self.check_codepoints = enabled;
        self
    }

    /// Offset of the next character to be consumed.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Total number of characters after normalisation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True for an empty document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Look at the character `offset` places ahead without consuming it.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#next-input-character)
    ///
    /// "Consume the next input character". Returns `None` at end of input.
    pub fn consume(&mut self) -> Option<char> {
        let Some(&c) = self.chars.get(self.pos) else {
            self.consumed_eof = true;
            return None;
        };
        self.validate(self.pos, c);
        self.pos += 1;
        self.consumed_eof = false;
        Some(c)
    }

    /// "Reconsume the current input character". The next `consume` returns
    /// the same character (or EOF) again.
    pub const fn reconsume(&mut self) {
        if self.consumed_eof {
            self.consumed_eof = false;
        } else if self.pos > 0 {
            self.pos -= 1;
        }
    }

    /// Consume `count` characters, stopping early at end of input.
    pub fn consume_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// "If the next few characters are..." with optional ASCII
    /// case-insensitivity. Does not consume.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str, case_insensitive: bool) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek(i).is_some_and(|actual| {
                if case_insensitive {
                    actual.eq_ignore_ascii_case(&expected)
                } else {
                    actual == expected
                }
            })
        })
    }

    /// Hand over validation errors found so far.
    pub fn drain_errors(&mut self) -> std::vec::Drain<'_, ParseError> {
        self.pending_errors.drain(..)
    }

    /// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of surrogates are surrogate-in-input-stream parse
    /// errors. Any occurrences of noncharacters are noncharacter-in-input-stream
    /// parse errors and any occurrences of controls other than ASCII whitespace
    /// and U+0000 NULL characters are control-character-in-input-stream parse
    /// errors."
    fn validate(&mut self, position: usize, c: char) {
        if position < self.validated_up_to {
            return;
        }
        self.validated_up_to = position + 1;

        if self.surrogate_positions.binary_search(&position).is_ok() {
            self.pending_errors.push(ParseError::new(
                ParseErrorCode::SurrogateInInputStream,
                position,
            ));
            return;
        }
        if !self.check_codepoints {
            return;
        }
        let code = if is_noncharacter(c) {
            ParseErrorCode::NoncharacterInInputStream
        } else if is_disallowed_control(c) {
            ParseErrorCode::ControlCharacterInInputStream
        } else {
            return;
        };
        self.pending_errors.push(ParseError::new(code, position));
    }
}

/// [Infra § 4.5 noncharacter](https://infra.spec.whatwg.org/#noncharacter)
///
/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
#[must_use]
pub const fn is_noncharacter(c: char) -> bool {
    let cp = c as u32;
    matches!(cp, 0xFDD0..=0xFDEF) || (cp & 0xFFFE) == 0xFFFE
}

/// [Infra § 4.5 control](https://infra.spec.whatwg.org/#control)
///
/// C0 controls and U+007F..U+009F, excluding ASCII whitespace and NULL.
#[must_use]
pub const fn is_disallowed_control(c: char) -> bool {
    let cp = c as u32;
    let is_control = cp <= 0x1F || (cp >= 0x7F && cp <= 0x9F);
    is_control && !matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ' | '\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(stream: &mut InputStream) -> String {
        std::iter::from_fn(|| stream.consume()).collect()
    }

    #[test]
    fn carriage_returns_become_line_feeds() {
        let mut stream = InputStream::new("a\r\nb\rc\r\r\nd");
        assert_eq!(collect(&mut stream), "a\nb\nc\n\nd");
    }

    #[test]
    fn reconsume_replays_character_and_eof() {
        let mut stream = InputStream::new("xy");
        assert_eq!(stream.consume(), Some('x'));
        stream.reconsume();
        assert_eq!(stream.consume(), Some('x'));
        assert_eq!(stream.consume(), Some('y'));
        assert_eq!(stream.consume(), None);
        stream.reconsume();
        assert_eq!(stream.consume(), None);
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn lookahead_is_case_insensitive_on_request() {
        let stream = InputStream::new("DocType html");
        assert!(stream.next_few_characters_are("doctype", true));
        assert!(!stream.next_few_characters_are("doctype", false));
        assert!(!stream.next_few_characters_are("DocType html!", false));
    }

    #[test]
    fn validation_reports_each_offset_once() {
        let mut stream = InputStream::new("a\u{1}b\u{FDD0}").with_codepoint_checks(true);
        let _ = stream.consume();
        let _ = stream.consume();
        stream.reconsume();
        let _ = stream.consume();
        stream.consume_n(2);
        let errors: Vec<_> = stream.drain_errors().collect();
        assert_eq!(
            errors,
            vec![
                ParseError::new(ParseErrorCode::ControlCharacterInInputStream, 1),
                ParseError::new(ParseErrorCode::NoncharacterInInputStream, 3),
            ]
        );
    }

    #[test]
    fn lone_surrogates_are_replaced_and_reported() {
        let units = [u16::from(b'a'), 0xD800, u16::from(b'b')];
        let mut stream = InputStream::from_utf16(&units);
        assert_eq!(collect(&mut stream), "a\u{FFFD}b");
        let errors: Vec<_> = stream.drain_errors().collect();
        assert_eq!(
            errors,
            vec![ParseError::new(ParseErrorCode::SurrogateInInputStream, 1)]
        );
    }

    #[test]
    fn noncharacter_and_control_classification() {
        assert!(is_noncharacter('\u{FFFE}'));
        assert!(is_noncharacter('\u{10FFFF}'));
        assert!(!is_noncharacter('\u{FFFD}'));
        assert!(is_disallowed_control('\u{7F}'));
        assert!(is_disallowed_control('\u{85}'));
        assert!(!is_disallowed_control('\t'));
        assert!(!is_disallowed_control('\0'));
    }
}
