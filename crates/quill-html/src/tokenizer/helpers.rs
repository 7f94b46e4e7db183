//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token") and the sink protocol
//! - End tag handling shared by the RCDATA, RAWTEXT and script data states
//! - Attribute helpers for duplicate detection

use tracing::trace;

use super::core::Tokenizer;
use super::state::TokenizerState;
use super::token::Token;
use super::{TokenSink, TokenSinkResult};
use crate::error::{ParseError, ParseErrorCode};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration of the main
    /// loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current input character is pushed back onto the input stream and
    /// processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.input.reconsume();
        self.state = new_state;
    }

    /// "Reconsume in the return state."
    pub(super) const fn reconsume_in_return_state(&mut self) {
        self.reconsume_in(self.return_state);
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
    /// U+000C FORM FEED (FF), U+0020 SPACE". CR never reaches the tokenizer.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// Hand a token to the sink and apply its answer.
    pub(super) fn emit(&mut self, token: Token) {
        if self.stopped {
            return;
        }
        let position = self.input.position();
        match self.sink.process_token(token, position) {
            TokenSinkResult::Continue => {}
            TokenSinkResult::SwitchState(state) => {
                trace!(%state, position, "tokenizer state set by sink");
                self.state = state;
            }
            TokenSinkResult::Stop => {
                trace!(position, "sink stopped tokenization");
                self.stopped = true;
            }
        }
    }

    /// "Emit the current tag token" / "Emit the current comment token" /
    /// "Emit the current DOCTYPE token".
    pub(super) fn emit_current_token(&mut self) {
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        token.remove_duplicate_attributes();
        match &token {
            Token::StartTag { name, .. } => {
                // "The last start tag token emitted is used as part of the
                // tree construction stage and in the RCDATA, RAWTEXT, and
                // script data states."
                self.last_start_tag_name = Some(name.clone());
            }
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                // "When an end tag token is emitted with attributes, that is
                // an end-tag-with-attributes parse error."
                if !attributes.is_empty() {
                    self.parse_error(ParseErrorCode::EndTagWithAttributes);
                }
                // "When an end tag token is emitted with its self-closing flag
                // set, that is an end-tag-with-trailing-solidus parse error."
                if *self_closing {
                    self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                }
            }
            _ => {}
        }
        self.emit(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.emit(Token::Character { data: c });
    }

    /// Emit one character token per character of `s`.
    pub(super) fn emit_characters(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_character_token(c);
        }
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.emit(Token::EndOfFile);
        self.at_eof = true;
    }

    /// Emit the current token followed by an end-of-file token. Used by the
    /// comment and DOCTYPE states on EOF.
    pub(super) fn emit_current_token_and_eof(&mut self) {
        self.emit_current_token();
        self.emit_eof_token();
    }

    /// EOF inside a DOCTYPE: "Set the current DOCTYPE token's force-quirks
    /// flag to on. Emit the current DOCTYPE token. Emit an end-of-file token."
    pub(super) fn emit_doctype_at_eof(&mut self) {
        self.parse_error(ParseErrorCode::EofInDoctype);
        if let Some(token) = self.current_token.as_mut() {
            token.set_force_quirks();
        }
        self.emit_current_token_and_eof();
    }
}

// =============================================================================
// RCDATA / RAWTEXT / Script data end tag helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// "Anything else" of the four end tag name states:
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// X state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.current_token = None;
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_characters(&buffer);
        self.temporary_buffer = buffer;
        self.reconsume_in(text_state);
    }

    /// Shared body of the RCDATA, RAWTEXT, script data and script data escaped
    /// end tag name states, which differ only in the state to fall back to.
    pub(super) fn handle_text_end_tag_name_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)" ... "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token,
            // then switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "...switch to the data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "ASCII upper alpha": append the lowercase version to the tag
            // name, and the character itself to the temporary buffer.
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            _ => self.emit_end_tag_name_anything_else(text_state),
        }
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    ///
    /// The duplicate still collects its value; it is dropped when the token is
    /// emitted.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);
        if is_duplicate {
            self.parse_error(ParseErrorCode::DuplicateAttribute);
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Report a parse error at the current input position. Parse errors are
    /// never fatal: the state machine has already chosen its recovery.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        let position = self.input.position().saturating_sub(1);
        self.sink.parse_error(ParseError::new(code, position));
    }

    /// Pass validation errors raised by the input stream on to the sink.
    pub(super) fn forward_input_errors(&mut self) {
        for error in self.input.drain_errors() {
            self.sink.parse_error(error);
        }
    }
}
