//! The "in select" and "in select in table" insertion modes.

use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::super::stack::Scope;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::Token;

/// Table tags that close an open select when it sits inside a table.
const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data)?,

            // "A comment token"
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from
                // the stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current_is("option");
                    let _ = self.insert_html_element(token)?;
                }

                // "A start tag whose tag name is "optgroup""
                "optgroup" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token)?;
                }

                // "A start tag whose tag name is "hr""
                // "If the current node is an option element, pop that node from
                // the stack of open elements. If the current node is an optgroup
                // element, pop that node from the stack of open elements. Insert
                // an HTML element for the token. Immediately pop the current node
                // off the stack of open elements. Acknowledge the token's
                // self-closing flag, if it is set."
                "hr" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token)?;
                    let _ = self.stack_of_open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                "select" => {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    if self.has_element_in_scope_of("select", Scope::Select) {
                        self.pop_until_tag("select");
                        self.reset_insertion_mode_appropriately();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: ... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    if !self.has_element_in_scope_of("select", Scope::Select) {
                        return Ok(ProcessResult::Done);
                    }
                    self.pop_until_tag("select");
                    self.reset_insertion_mode_appropriately();
                    return Ok(ProcessResult::Reprocess);
                }

                // "A start tag whose tag name is one of: "script", "template""
                "script" | "template" => {
                    return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
                }

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    // node immediately before it in the stack of open elements is
                    // an optgroup element, then pop the current node from the
                    // stack of open elements."
                    let len = self.stack_of_open_elements.len();
                    if self.current_node_is("option")
                        && len >= 2
                        && self.is_html_element(self.stack_of_open_elements[len - 2], "optgroup")
                    {
                        let _ = self.stack_of_open_elements.pop();
                    }
                    // "If the current node is an optgroup element, then pop that
                    // node from the stack of open elements. Otherwise, this is a
                    // parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    }
                }

                // "An end tag whose tag name is "option""
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    }
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    if !self.has_element_in_scope_of("select", Scope::Select) {
                        self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                        return Ok(ProcessResult::Done);
                    }
                    self.pop_until_tag("select");
                    self.reset_insertion_mode_appropriately();
                }

                "template" => return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead)),

                _ => self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name),
            },

            // "An end-of-file token"
            Token::EndOfFile => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),
        }
        Ok(ProcessResult::Done)
    }

    fn pop_if_current_is(&mut self, tag_name: &str) {
        if self.current_node_is(tag_name) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            // element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Ok(ProcessResult::Reprocess)
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                // "Parse error."
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then ignore the token."
                if !self.has_element_in_table_scope(name) {
                    return Ok(ProcessResult::Done);
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Ok(ProcessResult::Reprocess)
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion
            // mode."
            _ => Ok(ProcessResult::UseRulesFor(InsertionMode::InSelect)),
        }
    }
}
