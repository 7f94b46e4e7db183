use super::state::TokenizerState;
use super::token::Token;
use super::TokenSink;
use crate::error::ParseErrorCode;
use crate::input::InputStream;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to
/// tokenize HTML."
///
/// Tokens are handed to the sink `S` as soon as they are complete.
pub struct Tokenizer<S> {
    pub(super) state: TokenizerState,
    /// "The return state is used by character reference states to return to
    /// the state they were invoked from."
    pub(super) return_state: TokenizerState,
    pub(super) input: InputStream,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-code)
    /// "the character reference code"
    pub(super) character_reference_code: u32,

    pub(super) sink: S,
    /// Set when the sink answers `Stop`.
    pub(super) stopped: bool,
    /// Set once the end-of-file token has been emitted.
    pub(super) at_eof: bool,
}

impl<S: TokenSink> Tokenizer<S> {
    /// Create a tokenizer over `input` feeding `sink`.
    ///
    /// "The initial state is the data state."
    pub const fn new(input: InputStream, sink: S) -> Self {
        Self {
            state: TokenizerState::Data,
            return_state: TokenizerState::Data,
            input,
            current_input_character: None,
            current_token: None,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            sink,
            stopped: false,
            at_eof: false,
        }
    }

    /// Force the state before the first character is consumed. Fragment
    /// parsing starts in RCDATA, RAWTEXT, script data or PLAINTEXT depending
    /// on the context element.
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// Pretend a start tag with this name was already emitted, so a matching
    /// end tag counts as appropriate.
    pub fn set_last_start_tag(&mut self, name: Option<&str>) {
        self.last_start_tag_name = name.map(str::to_string);
    }

    /// Current state of the state machine.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Borrow the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give the sink back after tokenization.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run the state machine until the end-of-file token has been emitted or
    /// the sink asks to stop.
    pub fn run(&mut self) {
        while !self.stopped && !self.at_eof {
            // The numeric character reference end state does not consume.
            if self.state == TokenizerState::NumericCharacterReferenceEnd {
                self.handle_numeric_character_reference_end_state();
                continue;
            }
            self.current_input_character = self.input.consume();
            self.forward_input_errors();
            self.step();
        }
    }

    fn step(&mut self) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_rcdata_state(),
            TokenizerState::RAWTEXT => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RCDATALessThanSign => self.handle_text_less_than_sign_state(
                TokenizerState::RCDATAEndTagOpen,
                TokenizerState::RCDATA,
            ),
            TokenizerState::RCDATAEndTagOpen => self.handle_text_end_tag_open_state(
                TokenizerState::RCDATAEndTagName,
                TokenizerState::RCDATA,
            ),
            TokenizerState::RCDATAEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RCDATA);
            }
            TokenizerState::RAWTEXTLessThanSign => self.handle_text_less_than_sign_state(
                TokenizerState::RAWTEXTEndTagOpen,
                TokenizerState::RAWTEXT,
            ),
            TokenizerState::RAWTEXTEndTagOpen => self.handle_text_end_tag_open_state(
                TokenizerState::RAWTEXTEndTagName,
                TokenizerState::RAWTEXT,
            ),
            TokenizerState::RAWTEXTEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::RAWTEXT);
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => self.handle_text_end_tag_open_state(
                TokenizerState::ScriptDataEndTagName,
                TokenizerState::ScriptData,
            ),
            TokenizerState::ScriptDataEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(
                TokenizerState::ScriptDataEscapeStartDash,
            ),
            TokenizerState::ScriptDataEscapeStartDash => self
                .handle_script_data_escape_start_state(TokenizerState::ScriptDataEscapedDashDash),
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => self.handle_text_end_tag_open_state(
                TokenizerState::ScriptDataEscapedEndTagName,
                TokenizerState::ScriptDataEscaped,
            ),
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => self
                .handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataDoubleEscaped,
                    TokenizerState::ScriptDataEscaped,
                ),
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => self
                .handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataEscaped,
                    TokenizerState::ScriptDataDoubleEscaped,
                ),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDOCTYPEPublicKeyword => self.handle_after_doctype_keyword_state(
                TokenizerState::BeforeDOCTYPEPublicIdentifier,
                IdentifierKind::Public,
            ),
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_identifier_state(IdentifierKind::Public);
            }
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(IdentifierKind::Public, '"');
            }
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(IdentifierKind::Public, '\'');
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDOCTYPESystemKeyword => self.handle_after_doctype_keyword_state(
                TokenizerState::BeforeDOCTYPESystemIdentifier,
                IdentifierKind::System,
            ),
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_identifier_state(IdentifierKind::System);
            }
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(IdentifierKind::System, '"');
            }
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(IdentifierKind::System, '\'');
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
            TokenizerState::CDATASection => self.handle_cdata_section_state(),
            TokenizerState::CDATASectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CDATASectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::NamedCharacterReference => {
                self.handle_named_character_reference_state();
            }
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(16);
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(10);
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_numeric_character_reference_digits_state(16);
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_numeric_character_reference_digits_state(10);
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
            }
        }
    }

    fn with_current_token(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }

    /// Report `code`, then emit the end-of-file token.
    fn eof_with_error(&mut self, code: ParseErrorCode) {
        self.parse_error(code);
        self.emit_eof_token();
    }
}

/// Which DOCTYPE identifier a shared state handler is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentifierKind {
    Public,
    System,
}

// =============================================================================
// Text states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::Data;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::RCDATA;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('<') => self.switch_to(TokenizerState::RCDATALessThanSign),
            _ => self.handle_plain_text_character(),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RAWTEXTLessThanSign),
            _ => self.handle_plain_text_character(),
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThanSign),
            _ => self.handle_plain_text_character(),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self) {
        self.handle_plain_text_character();
    }

    /// The NULL, EOF and "anything else" entries shared by the RCDATA,
    /// RAWTEXT, script data and PLAINTEXT states.
    fn handle_plain_text_character(&mut self) {
        match self.current_input_character {
            // "This is an unexpected-null-character parse error. Emit a U+FFFD
            // REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// and [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_text_less_than_sign_state(
        &mut self,
        end_tag_open: TokenizerState,
        text_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "Set the temporary buffer to the empty string. Switch to the
            // RCDATA end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open);
            }
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    /// and its RAWTEXT, script data and script data escaped counterparts.
    fn handle_text_end_tag_open_state(
        &mut self,
        end_tag_name: TokenizerState,
        text_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "Create a new end tag token, set its tag name to the empty
            // string. Reconsume in the RCDATA end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(end_tag_name);
            }
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F
            // SOLIDUS character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text_state);
            }
        }
    }
}

// =============================================================================
// Tag states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to
            // the empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an
            // unexpected-question-mark-instead-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the
            // bogus comment state."
            Some('?') => {
                self.parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_token = Some(Token::new_comment(""));
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token and an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name
            // parse error. Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the data state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is a missing-end-tag-name parse error. Switch to the data state."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            // "This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token, a U+002F SOLIDUS character token
            // and an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "This is an invalid-first-character-of-tag-name parse error.
            // Create a comment token whose data is the empty string. Reconsume
            // in the bogus comment state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.current_token = Some(Token::new_comment(""));
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            // "Switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "Switch to the self-closing start tag state."
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            // "Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER character to the current tag token's
            // tag name."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_tag_name('\u{FFFD}'));
            }
            // "This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            // "ASCII upper alpha - Append the lowercase version of the current
            // input character to the current tag token's tag name."
            Some(c) => self.with_current_token(|t| t.append_to_tag_name(c.to_ascii_lowercase())),
        }
    }
}

// =============================================================================
// Script data escaping
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "Switch to the script data escape start state. Emit a U+003C
            // LESS-THAN SIGN character token and a U+0021 EXCLAMATION MARK
            // character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token('<');
                self.emit_character_token('!');
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    /// and [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn handle_script_data_escape_start_state(&mut self, on_dash: TokenizerState) {
        match self.current_input_character {
            // "Switch to the script data escape start dash state. Emit a
            // U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(on_dash);
                self.emit_character_token('-');
            }
            // "Reconsume in the script data state."
            _ => self.reconsume_in(TokenizerState::ScriptData),
        }
    }

    /// The NULL, EOF and "anything else" entries shared by the escaped and
    /// double escaped script states. `state` is the state to continue in.
    fn handle_escaped_script_character(&mut self, state: TokenizerState) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.switch_to(state);
                self.emit_character_token('\u{FFFD}');
            }
            // "This is an eof-in-script-html-comment-like-text parse error.
            // Emit an end-of-file token."
            None => self.eof_with_error(ParseErrorCode::EofInScriptHtmlCommentLikeText),
            Some(c) => {
                self.switch_to(state);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            // "Switch to the script data state. Emit a U+003E GREATER-THAN
            // SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "Set the temporary buffer to the empty string. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the script data
            // double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    /// and [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ///
    /// "If the temporary buffer is the string "script", then switch to
    /// `if_script`. Otherwise, switch to `otherwise`. Emit the current input
    /// character as a character token."
    fn handle_script_data_double_escape_boundary_state(
        &mut self,
        if_script: TokenizerState,
        otherwise: TokenizerState,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(if_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_character_token(c);
            }
            // "Append the lowercase version of the current input character to
            // the temporary buffer. Emit the current input character as a
            // character token."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(otherwise),
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "Set the temporary buffer to the empty string. Switch to the
            // script data double escape end state. Emit a U+002F SOLIDUS (/)
            // character token."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
                self.emit_character_token('/');
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped),
        }
    }
}

// =============================================================================
// Attribute states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF -
            // Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name parse
            // error. Start a new attribute in the current tag token. Set that
            // attribute's name to the current input character, and its value
            // to the empty string. Switch to the attribute name state."
            Some('=') => {
                self.parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.with_current_token(|t| {
                    t.start_new_attribute();
                    t.append_to_current_attribute_name('=');
                });
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Start a new attribute in the current tag token. Set that
            // attribute name and value to the empty string. Reconsume in the
            // attribute name state."
            Some(_) => {
                self.with_current_token(Token::start_new_attribute);
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            // "Switch to the before attribute value state."
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_current_attribute_name('\u{FFFD}'));
            }
            // "This is an unexpected-character-in-attribute-name parse error.
            // Treat it as per the "anything else" entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.with_current_token(|t| t.append_to_current_attribute_name(c));
            }
            Some(c) => self.with_current_token(|t| {
                t.append_to_current_attribute_name(c.to_ascii_lowercase());
            }),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            Some(_) => {
                self.with_current_token(Token::start_new_attribute);
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the
            // data state. Emit the current tag token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "Switch to the after attribute value (quoted) state."
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            // "Set the return state to the attribute value (double-quoted)
            // state. Switch to the character reference state."
            Some('&') => {
                self.return_state = self.state;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_current_attribute_value('\u{FFFD}'));
            }
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            Some(c) => self.with_current_token(|t| t.append_to_current_attribute_value(c)),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                self.return_state = TokenizerState::AttributeValueUnquoted;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_current_attribute_value('\u{FFFD}'));
            }
            // "This is an unexpected-character-in-unquoted-attribute-value
            // parse error. Treat it as per the "anything else" entry below."
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.with_current_token(|t| t.append_to_current_attribute_value(c));
            }
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            Some(c) => self.with_current_token(|t| t.append_to_current_attribute_value(c)),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            // "This is a missing-whitespace-between-attributes parse error.
            // Reconsume in the before attribute name state."
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to
            // the data state. Emit the current tag token."
            Some('>') => {
                self.with_current_token(Token::set_self_closing);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_with_error(ParseErrorCode::EofInTag),
            // "This is an unexpected-solidus-in-tag parse error. Reconsume in
            // the before attribute name state."
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }
}

// =============================================================================
// Comment states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "Emit the comment. Emit an end-of-file token."
            None => self.emit_current_token_and_eof(),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_comment('\u{FFFD}'));
            }
            Some(c) => self.with_current_token(|t| t.append_to_comment(c)),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If the next few characters are..." - this state looks ahead instead of
    /// consuming, so the character taken by the main loop is put back first.
    fn handle_markup_declaration_open_state(&mut self) {
        self.input.reconsume();

        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two
        // characters, create a comment token whose data is the empty string,
        // and switch to the comment start state."
        if self.input.next_few_characters_are("--", false) {
            self.input.consume_n(2);
            self.current_token = Some(Token::new_comment(""));
            self.switch_to(TokenizerState::CommentStart);
        }
        // "ASCII case-insensitive match for the word "DOCTYPE" - Consume those
        // characters and switch to the DOCTYPE state."
        else if self.input.next_few_characters_are("DOCTYPE", true) {
            self.input.consume_n(7);
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a
        // U+005B LEFT SQUARE BRACKET character before and after) - Consume
        // those characters. If there is an adjusted current node and it is not
        // an element in the HTML namespace, then switch to the CDATA section
        // state. Otherwise, this is a cdata-in-html-content parse error. Create
        // a comment token whose data is the "[CDATA[" string. Switch to the
        // bogus comment state."
        else if self.input.next_few_characters_are("[CDATA[", false) {
            self.input.consume_n(7);
            if self.sink.cdata_section_allowed() {
                self.switch_to(TokenizerState::CDATASection);
            } else {
                self.parse_error(ParseErrorCode::CdataInHtmlContent);
                self.current_token = Some(Token::new_comment("[CDATA["));
                self.switch_to(TokenizerState::BogusComment);
            }
        }
        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        else {
            self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
            self.current_token = Some(Token::new_comment(""));
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch
            // to the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            // "Append a U+002D HYPHEN-MINUS character (-) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.with_current_token(|t| t.append_to_comment('-'));
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "Append the current input character to the comment token's data.
            // Switch to the comment less-than sign state."
            Some('<') => {
                self.with_current_token(|t| t.append_to_comment('<'));
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_comment('\u{FFFD}'));
            }
            None => self.eof_in_comment(),
            Some(c) => self.with_current_token(|t| t.append_to_comment(c)),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.with_current_token(|t| t.append_to_comment('!'));
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.with_current_token(|t| t.append_to_comment('<')),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    fn handle_comment_less_than_sign_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDash),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(TokenizerState::CommentEndDash),
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "This is a nested-comment parse error. Reconsume in the comment
            // end state."
            Some(_) => {
                self.parse_error(ParseErrorCode::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.with_current_token(|t| t.append_to_comment('-'));
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.with_current_token(|t| t.append_to_comment('-')),
            None => self.eof_in_comment(),
            // "Append two U+002D HYPHEN-MINUS characters (-) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.with_current_token(|t| t.append_str_to_comment("--"));
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.with_current_token(|t| t.append_str_to_comment("--!"));
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "This is an incorrectly-closed-comment parse error. Switch to
            // the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.with_current_token(|t| t.append_str_to_comment("--!"));
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "This is an eof-in-comment parse error. Emit the current comment token.
    /// Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(ParseErrorCode::EofInComment);
        self.emit_current_token_and_eof();
    }
}

// =============================================================================
// DOCTYPE states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Emit the current token.
            // Emit an end-of-file token."
            None => {
                self.current_token = Some(Token::new_doctype());
                self.emit_doctype_at_eof();
            }
            // "This is a missing-whitespace-before-doctype-name parse error.
            // Reconsume in the before DOCTYPE name state."
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "This is a missing-doctype-name parse error. Create a new
            // DOCTYPE token. Set its force-quirks flag to on. Switch to the
            // data state. Emit the current token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => {
                self.current_token = Some(Token::new_doctype());
                self.emit_doctype_at_eof();
            }
            // "Create a new DOCTYPE token. Set the token's name to the
            // lowercase version of the current input character. Switch to the
            // DOCTYPE name state."
            Some(c) => {
                let c = if c == '\0' {
                    self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(c);
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_current_token(|t| t.append_to_doctype_name('\u{FFFD}'));
            }
            None => self.emit_doctype_at_eof(),
            Some(c) => self.with_current_token(|t| t.append_to_doctype_name(c.to_ascii_lowercase())),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_doctype_at_eof(),
            Some(_) => {
                // "If the six characters starting from the current input
                // character are an ASCII case-insensitive match for the word
                // "PUBLIC", then consume those characters and switch to the
                // after DOCTYPE public keyword state."
                self.input.reconsume();
                if self.input.next_few_characters_are("PUBLIC", true) {
                    self.input.consume_n(6);
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if self.input.next_few_characters_are("SYSTEM", true) {
                    self.input.consume_n(6);
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    // "Otherwise, this is an
                    // invalid-character-sequence-after-doctype-name parse
                    // error. Set the current DOCTYPE token's force-quirks flag
                    // to on. Reconsume in the bogus DOCTYPE state."
                    self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                    self.with_current_token(Token::set_force_quirks);
                    self.switch_to(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn handle_after_doctype_keyword_state(
        &mut self,
        before_identifier: TokenizerState,
        kind: IdentifierKind,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(before_identifier),
            // "This is a missing-whitespace-after-doctype-public-keyword parse
            // error. Set the current DOCTYPE token's public identifier to the
            // empty string (not missing), then switch to the DOCTYPE public
            // identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(match kind {
                    IdentifierKind::Public => ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword,
                    IdentifierKind::System => ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword,
                });
                self.begin_doctype_identifier(kind, quote);
            }
            _ => self.handle_doctype_identifier_fallback(kind),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn handle_before_doctype_identifier_state(&mut self, kind: IdentifierKind) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(kind, quote),
            _ => self.handle_doctype_identifier_fallback(kind),
        }
    }

    /// Set the identifier to the empty string and switch to the matching
    /// quoted identifier state.
    fn begin_doctype_identifier(&mut self, kind: IdentifierKind, quote: char) {
        let next = match (kind, quote) {
            (IdentifierKind::Public, '"') => {
                self.with_current_token(Token::set_public_identifier_empty);
                TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted
            }
            (IdentifierKind::Public, _) => {
                self.with_current_token(Token::set_public_identifier_empty);
                TokenizerState::DOCTYPEPublicIdentifierSingleQuoted
            }
            (IdentifierKind::System, '"') => {
                self.with_current_token(Token::set_system_identifier_empty);
                TokenizerState::DOCTYPESystemIdentifierDoubleQuoted
            }
            (IdentifierKind::System, _) => {
                self.with_current_token(Token::set_system_identifier_empty);
                TokenizerState::DOCTYPESystemIdentifierSingleQuoted
            }
        };
        self.switch_to(next);
    }

    /// The `>`, EOF and "anything else" entries of the keyword and before
    /// identifier states.
    fn handle_doctype_identifier_fallback(&mut self, kind: IdentifierKind) {
        match self.current_input_character {
            // "This is a missing-doctype-public-identifier parse error. Set
            // the current DOCTYPE token's force-quirks flag to on. Switch to
            // the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(match kind {
                    IdentifierKind::Public => ParseErrorCode::MissingDoctypePublicIdentifier,
                    IdentifierKind::System => ParseErrorCode::MissingDoctypeSystemIdentifier,
                });
                self.with_current_token(Token::set_force_quirks);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_doctype_at_eof(),
            // "This is a missing-quote-before-doctype-public-identifier parse
            // error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error(match kind {
                    IdentifierKind::Public => {
                        ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier
                    }
                    IdentifierKind::System => {
                        ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier
                    }
                });
                self.with_current_token(Token::set_force_quirks);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.59](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state),
    /// § 13.2.5.60, § 13.2.5.65 and § 13.2.5.66: the four quoted identifier
    /// states.
    fn handle_doctype_identifier_quoted_state(&mut self, kind: IdentifierKind, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(match kind {
                IdentifierKind::Public => TokenizerState::AfterDOCTYPEPublicIdentifier,
                IdentifierKind::System => TokenizerState::AfterDOCTYPESystemIdentifier,
            }),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_doctype_identifier(kind, '\u{FFFD}');
            }
            // "This is an abrupt-doctype-public-identifier parse error. Set
            // the current DOCTYPE token's force-quirks flag to on. Switch to
            // the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(match kind {
                    IdentifierKind::Public => ParseErrorCode::AbruptDoctypePublicIdentifier,
                    IdentifierKind::System => ParseErrorCode::AbruptDoctypeSystemIdentifier,
                });
                self.with_current_token(Token::set_force_quirks);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_doctype_at_eof(),
            Some(c) => self.append_to_doctype_identifier(kind, c),
        }
    }

    fn append_to_doctype_identifier(&mut self, kind: IdentifierKind, c: char) {
        match kind {
            IdentifierKind::Public => self.with_current_token(|t| t.append_to_public_identifier(c)),
            IdentifierKind::System => self.with_current_token(|t| t.append_to_system_identifier(c)),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "This is a missing-whitespace-between-doctype-public-and-system-identifiers
            // parse error. Set the current DOCTYPE token's system identifier
            // to the empty string (not missing), then switch to the DOCTYPE
            // system identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.begin_doctype_identifier(IdentifierKind::System, quote);
            }
            None => self.emit_doctype_at_eof(),
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.with_current_token(Token::set_force_quirks);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.begin_doctype_identifier(IdentifierKind::System, quote);
            }
            None => self.emit_doctype_at_eof(),
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.with_current_token(Token::set_force_quirks);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_doctype_at_eof(),
            // "This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does
            // not set the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "This is an unexpected-null-character parse error. Ignore the character."
            Some('\0') => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
            // "Emit the DOCTYPE token. Emit an end-of-file token."
            None => self.emit_current_token_and_eof(),
            Some(_) => {}
        }
    }
}

// =============================================================================
// CDATA states
// =============================================================================

impl<S: TokenSink> Tokenizer<S> {
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CDATASectionBracket),
            None => self.eof_with_error(ParseErrorCode::EofInCdata),
            // "U+0000 NULL characters are handled in the tree construction
            // stage, as part of the in foreign content insertion mode."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    fn handle_cdata_section_bracket_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CDATASectionEnd),
            _ => {
                self.emit_character_token(']');
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.emit_character_token(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            // "Emit two U+005D RIGHT SQUARE BRACKET character tokens.
            // Reconsume in the CDATA section state."
            _ => {
                self.emit_characters("]]");
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}
