//! Table insertion modes: "in table", "in table text", "in caption", "in column
//! group", "in table body", "in row" and "in cell".

use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::super::stack::Scope;
use super::is_whitespace;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::Token;

/// Table sections, for "in table body".
const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the
            // token."
            Token::Character { .. }
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = self.insertion_mode;
                self.switch_mode(InsertionMode::InTableText);
                return Ok(ProcessResult::Reprocess);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at
                // the end of the list of active formatting elements. Insert an
                // HTML element for the token, then switch the insertion mode to
                // "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.push_formatting_marker();
                    let _ = self.insert_html_element(token)?;
                    self.switch_mode(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token)?;
                    self.switch_mode(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Insert an HTML element for a "colgroup" start tag token with
                // no attributes, then switch the insertion mode to "in column
                // group". Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("colgroup")?;
                    self.switch_mode(InsertionMode::InColumnGroup);
                    return Ok(ProcessResult::Reprocess);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                // "thead""
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token)?;
                    self.switch_mode(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Insert an HTML element for a "tbody" start tag token with no
                // attributes, then switch the insertion mode to "in table body".
                // Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("tbody")?;
                    self.switch_mode(InsertionMode::InTableBody);
                    return Ok(ProcessResult::Reprocess);
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error."
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    // "If the stack of open elements does not have a table
                    // element in table scope, ignore the token."
                    if !self.has_element_in_table_scope("table") {
                        return Ok(ProcessResult::Done);
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    // element has been popped from the stack. Reset the insertion
                    // mode appropriately. Reprocess the token."
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                    return Ok(ProcessResult::Reprocess);
                }

                // "A start tag whose tag name is one of: "style", "script",
                // "template""
                "style" | "script" | "template" => {
                    return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: act as
                // described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the token.
                // Pop that input element off the stack of open elements.
                // Acknowledge the token's self-closing flag, if it is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
                {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    let _ = self.insert_html_element(token)?;
                    let _ = self.stack_of_open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    // "Parse error."
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    // "If there is a template element on the stack of open
                    // elements, or if the form element pointer is not null,
                    // ignore the token."
                    if self.stack_contains("template") || self.form_element_pointer.is_some() {
                        return Ok(ProcessResult::Done);
                    }
                    // "Otherwise: Insert an HTML element for the token, and set
                    // the form element pointer to point to the element created.
                    // Pop that form element off the stack of open elements."
                    let form = self.insert_html_element(token)?;
                    self.form_element_pointer = Some(form);
                    let _ = self.stack_of_open_elements.pop();
                }

                _ => return self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    // "If the stack of open elements does not have a table
                    // element in table scope, this is a parse error; ignore the
                    // token."
                    if !self.has_element_in_table_scope("table") {
                        self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                        return Ok(ProcessResult::Done);
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    // element has been popped from the stack. Reset the insertion
                    // mode appropriately."
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                }

                // "An end tag whose tag name is "template""
                "template" => return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead)),

                _ => return self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),

            Token::Character { .. } => return self.in_table_anything_else(token),
        }
        Ok(ProcessResult::Done)
    }

    /// "Anything else" of "in table":
    ///
    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            Token::Character { data } => {
                self.parse_error_with(ParseErrorCode::FosterParentedContent, &data.to_string());
            }
            Token::StartTag { name, .. } | Token::EndTag { name, .. } => {
                self.parse_error_with(ParseErrorCode::FosterParentedContent, name);
            }
            _ => self.parse_error(ParseErrorCode::FosterParentedContent),
        }
        self.foster_parenting = true;
        let result = self.process_nested(InsertionMode::InBody, token);
        self.foster_parenting = false;
        result
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }

            // "Any other character token"
            // "Append the character token to the pending table character tokens
            // list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);
                // "If any of the tokens in the pending table character tokens
                // list are character tokens that are not ASCII whitespace, then
                // this is a parse error: reprocess the character tokens in the
                // pending table character tokens list using the rules given in
                // the "anything else" entry in the "in table" insertion mode."
                if pending.chars().any(|c| !is_whitespace(c)) {
                    for c in pending.chars() {
                        let _ = self.in_table_anything_else(&Token::Character { data: c })?;
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending
                    // table character tokens list."
                    for c in pending.chars() {
                        self.insert_character(c)?;
                    }
                }
                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                self.switch_mode(self.original_insertion_mode);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption(name);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if self.close_caption(name) {
                    return Ok(ProcessResult::Reprocess);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption(name) {
                    return Ok(ProcessResult::Reprocess);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),
        }
        Ok(ProcessResult::Done)
    }

    /// Close the open caption. Returns false when there was none in table
    /// scope and the token was ignored.
    fn close_caption(&mut self, tag_name: &str) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment case)"
        if !self.has_element_in_table_scope("caption") {
            self.parse_error_with(ParseErrorCode::UnexpectedEndTag, tag_name);
            return false;
        }
        // "1. Generate implied end tags.
        // 2. Now, if the current node is not a caption element, then this is a
        //    parse error.
        // 3. Pop elements from this stack until a caption element has been
        //    popped from the stack.
        // 4. Clear the list of active formatting elements up to the last
        //    marker.
        // 5. Switch the insertion mode to "in table"."
        self.generate_implied_end_tags(None);
        if !self.current_node_is("caption") {
            self.parse_error_with(ParseErrorCode::MisnestedTag, "caption");
        }
        self.pop_until_tag("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.switch_mode(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(
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

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "An end-of-file token"
            Token::EndOfFile => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements."
            // "Switch the insertion mode to "in table"."
            // "Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.report_unexpected(token);
                    return Ok(ProcessResult::Done);
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InTable);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(
        &mut self,
        token: &Token,
    ) -> Result<ProcessResult> {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element_named("tr")?;
                self.switch_mode(InsertionMode::InRow);
                return Ok(ProcessResult::Reprocess);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise: Clear the stack back to a table body context. Pop
                // the current node from the stack of open elements. Switch the
                // insertion mode to "in table"."
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                if !self.has_any_element_in_scope(TABLE_SECTIONS, Scope::Table) {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    if self.options.disable_ignore_token_in_body_start_tag {
                        return Ok(ProcessResult::UseRulesFor(InsertionMode::InTable));
                    }
                    return Ok(ProcessResult::Done);
                }
                return Ok(self.close_table_section());
            }

            // "An end tag whose tag name is "table""
            Token::EndTag { name, .. } if name == "table" => {
                // "If the stack of open elements does not have a tbody, thead,
                // or tfoot element in table scope, this is a parse error; ignore
                // the token."
                if !self.has_any_element_in_scope(TABLE_SECTIONS, Scope::Table) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                return Ok(self.close_table_section());
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => return Ok(ProcessResult::UseRulesFor(InsertionMode::InTable)),
        }
        Ok(ProcessResult::Done)
    }

    /// "Clear the stack back to a table body context. Pop the current node from
    /// the stack of open elements. Switch the insertion mode to "in table".
    /// Reprocess the token."
    fn close_table_section(&mut self) -> ProcessResult {
        self.clear_stack_back_to_table_body_context();
        let _ = self.stack_of_open_elements.pop();
        self.switch_mode(InsertionMode::InTable);
        ProcessResult::Reprocess
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // cell". Insert a marker at the end of the list of active
            // formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::InCell);
                self.push_formatting_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                // "If the stack of open elements does not have a tr element in
                // table scope, this is a parse error; ignore the token."
                if !self.has_element_in_table_scope("tr") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.close_table_row();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                return Ok(self.close_table_row_and_reprocess(name, true));
            }
            Token::EndTag { name, .. } if name == "table" => {
                return Ok(self.close_table_row_and_reprocess(name, false));
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                if !self.has_element_in_table_scope("tr") {
                    return Ok(ProcessResult::Done);
                }
                self.close_table_row();
                return Ok(ProcessResult::Reprocess);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => return Ok(ProcessResult::UseRulesFor(InsertionMode::InTable)),
        }
        Ok(ProcessResult::Done)
    }

    /// "Clear the stack back to a table row context. Pop the current node
    /// (which will be a tr element) from the stack of open elements. Switch the
    /// insertion mode to "in table body"."
    fn close_table_row(&mut self) {
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.switch_mode(InsertionMode::InTableBody);
    }

    fn close_table_row_and_reprocess(&mut self, tag_name: &str, is_start_tag: bool) -> ProcessResult {
        // "If the stack of open elements does not have a tr element in table
        // scope, this is a parse error; ignore the token."
        if !self.has_element_in_table_scope("tr") {
            let code = if is_start_tag {
                ParseErrorCode::UnexpectedStartTag
            } else {
                ParseErrorCode::UnexpectedEndTag
            };
            self.parse_error_with(code, tag_name);
            return ProcessResult::Done;
        }
        // "Otherwise: ... Reprocess the token."
        self.close_table_row();
        ProcessResult::Reprocess
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the
                // token."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "1. Generate implied end tags.
                // 2. Now, if the current node is not an HTML element with the
                //    same tag name as the token, then this is a parse error.
                // 3. Pop elements from the stack of open elements until an HTML
                //    element with the same tag name as the token has been popped
                //    from the stack.
                // 4. Clear the list of active formatting elements up to the last
                //    marker.
                // 5. Switch the insertion mode to "in row"."
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                }
                self.pop_until_tag(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                // "Assert: The stack of open elements has a td or th element in
                // table scope."
                if !self.has_element_in_table_scope("td") && !self.has_element_in_table_scope("th")
                {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Close the cell (see below) and reprocess the token."
                self.close_the_cell();
                return Ok(ProcessResult::Reprocess);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the
                // token."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise, close the cell (see below) and reprocess the
                // token."
                self.close_the_cell();
                return Ok(ProcessResult::Reprocess);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => return Ok(ProcessResult::UseRulesFor(InsertionMode::InBody)),
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "1. Generate implied end tags.
    /// 2. If the current node is not now a td element or a th element, then
    ///    this is a parse error.
    /// 3. Pop elements from the stack of open elements until a td element or a
    ///    th element has been popped from the stack.
    /// 4. Clear the list of active formatting elements up to the last marker.
    /// 5. Switch the insertion mode to "in row"."
    fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorCode::MisnestedTag);
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_active_formatting_elements_to_last_marker();
        self.switch_mode(InsertionMode::InRow);
    }
}
