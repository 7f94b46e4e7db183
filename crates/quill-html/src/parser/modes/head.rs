//! The "in head", "in head noscript" and "after head" insertion modes.

use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::is_whitespace;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of ... whitespace"
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data)?,

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "A start tag whose tag name is "meta""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") =>
            {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.parse_generic_text_element(token, TokenizerState::RCDATA)?;
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "noframes" | "style")
                    || (name == "noscript" && self.options.scripting_enabled) =>
            {
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT)?;
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::InHeadNoscript);
            }

            // "A start tag whose tag name is "script""
            // STEP 1-8: create the script element at the adjusted insertion
            // location and push it onto the stack of open elements.
            // STEP 9: "Switch the tokenizer to the script data state."
            // STEP 10: "Let the original insertion mode be the current
            // insertion mode."
            // STEP 11: "Switch the insertion mode to "text"."
            Token::StartTag { name, .. } if name == "script" => {
                self.parse_generic_text_element(token, TokenizerState::ScriptData)?;
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::AfterHead);
            }

            // "A start tag whose tag name is "template""
            Token::StartTag { name, .. } if name == "template" => {
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token)?;
                // "Insert a marker at the end of the list of active formatting
                // elements."
                self.push_formatting_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.switch_mode(InsertionMode::InTemplate);
                // "Push "in template" onto the stack of template insertion
                // modes so that it is the new current template insertion mode."
                self.template_insertion_modes.push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => {
                // "If there is no template element on the stack of open
                // elements, then this is a parse error; ignore the token."
                if !self.stack_contains("template") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Generate all implied end tags thoroughly."
                self.generate_all_implied_end_tags_thoroughly();
                // "If the current node is not a template element, then this is
                // a parse error."
                if !self.current_node_is("template") {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                }
                // "Pop elements from the stack of open elements until a
                // template element has been popped from the stack."
                self.pop_until_tag("template");
                // "Clear the list of active formatting elements up to the last
                // marker."
                self.clear_active_formatting_elements_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                // template insertion modes."
                let _ = self.template_insertion_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode_appropriately();
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
            }
            Token::EndTag { name, .. } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            // "Reprocess the token."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::AfterHead);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps.
    ///
    /// 1. Insert an HTML element for the token.
    /// 2. If the algorithm that was invoked is the generic raw text element
    ///    parsing algorithm, switch the tokenizer to the RAWTEXT state;
    ///    otherwise the algorithm invoked was the generic RCDATA element
    ///    parsing algorithm, switch the tokenizer to the RCDATA state.
    /// 3. Let the original insertion mode be the current insertion mode.
    /// 4. Then, switch the insertion mode to "text"."
    pub(in crate::parser) fn parse_generic_text_element(
        &mut self,
        token: &Token,
        state: TokenizerState,
    ) -> Result<()> {
        let _ = self.insert_html_element(token)?;
        self.switch_tokenizer_to(state);
        self.original_insertion_mode = self.insertion_mode;
        self.switch_mode(InsertionMode::Text);
        Ok(())
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InHead);
            }

            // "A character token that is one of ... whitespace"
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::Character { data } if is_whitespace(*data) => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }
            Token::Comment { .. } => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
            }
            Token::EndTag { name, .. } if name != "br" => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Parse error."
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the token."
            _ => {
                self.report_unexpected(token);
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InHead);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of ... whitespace"
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data)?,

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody));
            }

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in frameset"."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                        | "style" | "template" | "title"
                ) =>
            {
                // "Parse error."
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                // "Push the node pointed to by the head element pointer onto the
                // stack of open elements."
                let Some(head) = self.head_element_pointer else {
                    return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
                };
                self.stack_of_open_elements.push(head);
                // "Process the token using the rules for the "in head" insertion
                // mode."
                let result = self.handle_in_head_mode(token)?;
                // "Remove the node pointed to by the head element pointer from
                // the stack of open elements. (It might not be the current node
                // at this point.)"
                self.remove_from_stack(head);
                return Ok(result);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
            }
            Token::EndTag { name, .. } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Insert an HTML element for a "body" start tag token with no
            // attributes."
            // "Switch the insertion mode to "in body"."
            // "Reprocess the current token."
            _ => {
                let _ = self.insert_html_element_named("body")?;
                self.switch_mode(InsertionMode::InBody);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// Report the parse error for a token no rule of the current mode accepts.
    pub(in crate::parser) fn report_unexpected(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, .. } => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
            }
            Token::EndTag { name, .. } => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }
            Token::Character { data } => {
                self.parse_error_with(ParseErrorCode::UnexpectedCharacter, &data.to_string());
            }
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),
            Token::EndOfFile => self.parse_error(ParseErrorCode::EofWithUnclosedElements),
            Token::Comment { .. } => {}
        }
    }
}
