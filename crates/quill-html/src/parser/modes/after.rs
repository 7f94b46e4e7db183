//! The "after body", "in frameset", "after frameset", "after after body" and
//! "after after frameset" insertion modes.

use quill_dom::NodeId;

use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::is_whitespace;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of ... whitespace"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Character { data } if is_whitespace(*data) => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.stack_of_open_elements.first().copied();
                self.insert_comment(data, Some(html.unwrap_or(NodeId::ROOT)))?;
            }

            // "A DOCTYPE token"
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment
            // case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                if self.context_element.is_some() {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                } else {
                    self.switch_mode(InsertionMode::AfterAfterBody);
                }
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {}

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.report_after_body_token(token);
                self.switch_mode(InsertionMode::InBody);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of ... whitespace"
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data)?,

            Token::Comment { data } => self.insert_comment(data, None)?,
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token)?;
            }

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name, .. } if name == "frameset" => {
                // "If the current node is the root html element, then this is a
                // parse error; ignore the token. (fragment case)"
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise, pop the current node from the stack of open
                // elements."
                let _ = self.stack_of_open_elements.pop();
                // "If the parser was not created as part of the HTML fragment
                // parsing algorithm (fragment case), and the current node is no
                // longer a frameset element, then switch the insertion mode to
                // "after frameset"."
                if self.context_element.is_none() && !self.current_node_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
            }

            // "A start tag whose tag name is "frame""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "frame" => {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "noframes""
            Token::StartTag { name, .. } if name == "noframes" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error."
            // "Note: The current node can only be the root html element in the
            // fragment case."
            // "Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error_with(ParseErrorCode::EofWithUnclosedElements, "frameset");
                }
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.report_unexpected(token),
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data)?,
            Token::Comment { data } => self.insert_comment(data, None)?,
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterFrameset);
            }

            Token::StartTag { name, .. } if name == "noframes" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {}

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.report_unexpected(token),
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT))?,

            // "A DOCTYPE token"
            // "A character token that is one of ... whitespace"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Doctype { .. } => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),
            Token::Character { data } if is_whitespace(*data) => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {}

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.report_after_body_token(token);
                self.switch_mode(InsertionMode::InBody);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT))?,
            Token::Doctype { .. } => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),
            Token::Character { data } if is_whitespace(*data) => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }
            Token::EndOfFile => {}

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::StartTag { name, .. } if name == "noframes" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.report_unexpected(token),
        }
        Ok(ProcessResult::Done)
    }

    fn report_after_body_token(&mut self, token: &Token) {
        match token {
            Token::Character { data } => {
                self.parse_error_with(ParseErrorCode::UnexpectedTokenAfterBody, &data.to_string());
            }
            Token::StartTag { name, .. } | Token::EndTag { name, .. } => {
                self.parse_error_with(ParseErrorCode::UnexpectedTokenAfterBody, name);
            }
            _ => self.parse_error(ParseErrorCode::UnexpectedTokenAfterBody),
        }
    }
}
