//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.
//!
//! The tokenizer pushes each completed token into a [`TokenSink`] as soon as
//! it is produced. The sink answers with a [`TokenSinkResult`], which is the
//! only way anything outside the tokenizer can change its state.

/// Character reference states per § 13.2.5.72 - § 13.2.5.80.
pub mod character_reference;
/// The tokenizer state machine.
pub mod core;
/// State transition, lookahead and emission helpers.
pub mod helpers;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Tokenizer state enumeration.
pub mod state;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::Tokenizer;
pub use state::TokenizerState;
pub use token::{Attribute, Token};

use crate::error::ParseError;

/// What the tokenizer should do after handing over a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSinkResult {
    /// Keep tokenizing in the current state.
    Continue,
    /// Switch to this state before consuming the next character. This is how
    /// the tree constructor moves the tokenizer into RCDATA, RAWTEXT, script
    /// data or PLAINTEXT after the matching start tag.
    SwitchState(TokenizerState),
    /// Stop tokenizing. No end-of-file token follows.
    Stop,
}

/// Consumer of the token stream.
pub trait TokenSink {
    /// Handle one token. `position` is the character offset just past the
    /// token in the normalised input.
    fn process_token(&mut self, token: Token, position: usize) -> TokenSinkResult;

    /// Observe a parse error. Never affects tokenization.
    fn parse_error(&mut self, error: ParseError);

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace, then switch to the CDATA section state."
    fn cdata_section_allowed(&self) -> bool {
        false
    }
}

/// A reduced consumer that records tokens and errors without building a tree.
///
/// It applies the same raw-text state switches the tree constructor would
/// (`title`/`textarea` to RCDATA, `style`/`xmp`/`iframe`/`noembed`/`noframes`
/// to RAWTEXT, `script` to script data, `plaintext` to PLAINTEXT), so the
/// token stream matches what a full parse would see.
pub struct TokenCollector {
    /// Tokens in emission order. Character data is one token per code point.
    pub tokens: Vec<Token>,
    /// Parse errors in the order they were raised.
    pub errors: Vec<ParseError>,
    stop_when: Option<Box<dyn FnMut(&Token) -> bool>>,
}

impl TokenCollector {
    /// Collect every token until end of input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            errors: Vec::new(),
            stop_when: None,
        }
    }

    /// Stop after the first token for which `predicate` returns true. That
    /// token is still recorded.
    #[must_use]
    pub fn stop_when(predicate: impl FnMut(&Token) -> bool + 'static) -> Self {
        Self {
            stop_when: Some(Box::new(predicate)),
            ..Self::new()
        }
    }
}

impl Default for TokenCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSink for TokenCollector {
    fn process_token(&mut self, token: Token, _position: usize) -> TokenSinkResult {
        let stop = self
            .stop_when
            .as_mut()
            .is_some_and(|predicate| predicate(&token));
        let switch = match &token {
            Token::StartTag { name, .. } => match name.as_str() {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "script" => Some(TokenizerState::ScriptData),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            },
            _ => None,
        };
        self.tokens.push(token);
        if stop {
            TokenSinkResult::Stop
        } else if let Some(state) = switch {
            TokenSinkResult::SwitchState(state)
        } else {
            TokenSinkResult::Continue
        }
    }

    fn parse_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }
}

/// Tokenize `input` to completion and return the collected tokens.
#[must_use]
pub fn tokenize(input: &str) -> TokenCollector {
    let mut tokenizer = Tokenizer::new(crate::input::InputStream::new(input), TokenCollector::new());
    tokenizer.run();
    tokenizer.into_sink()
}
