//! The "in body" and "text" insertion modes.

use quill_dom::{Attribute, Namespace, QuirksMode};

use super::super::adoption::AdoptionOutcome;
use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::super::formatting::FORMATTING_ELEMENTS;
use super::super::stack::{ALLOWED_OPEN_AT_END_OF_BODY, Scope};
use super::is_whitespace;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::{Token, TokenizerState};

/// Start tags that close a `p` in button scope and open a block.
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// End tags that close the matching element in scope.
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Start tags processed with the "in head" rules.
const HEAD_START_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Table structure start tags with no meaning in body.
const IGNORED_START_TAGS: &[&str] = &[
    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }

            // "A character token that is one of ... whitespace"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            Token::Character { data } if is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_character(*data)?;
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_character(*data)?;
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => return self.handle_in_body_start_tag(token, name, attributes, *self_closing),

            Token::EndTag { name, .. } => return self.handle_in_body_end_tag(name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    return Ok(ProcessResult::UseRulesFor(InsertionMode::InTemplate));
                }
                // "Otherwise, follow these steps:
                // 1. If there is a node in the stack of open elements that is
                //    not either a dd element, ... or the html element, then
                //    this is a parse error.
                // 2. Stop parsing."
                self.report_unclosed_elements(ParseErrorCode::EofWithUnclosedElements);
            }
        }
        Ok(ProcessResult::Done)
    }

    #[allow(clippy::too_many_lines)]
    fn handle_in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        attributes: &[Attribute],
        self_closing: bool,
    ) -> Result<ProcessResult> {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                // "If there is a template element on the stack of open
                // elements, then ignore the token."
                // "Otherwise, for each attribute on the token, check to see if
                // the attribute is already present on the top element of the
                // stack of open elements. If it is not, add the attribute and
                // its corresponding value to that element."
                if !self.stack_contains("template")
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_attributes_into(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            _ if HEAD_START_TAGS.contains(&name) => {
                return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead));
            }

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                // "If the second element on the stack of open elements is not a
                // body element, if the stack of open elements has only one node
                // on it, or if there is a template element on the stack of open
                // elements, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                // each attribute on the token, check to see if the attribute is
                // already present on the body element (the second element) on
                // the stack of open elements, and if it is not, add the
                // attribute and its corresponding value to that element."
                if let Some(&body) = self.stack_of_open_elements.get(1)
                    && self.is_html_element(body, "body")
                    && !self.stack_contains("template")
                {
                    self.frameset_ok = false;
                    self.merge_attributes_into(body, attributes);
                }
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a body
                // element, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return Ok(ProcessResult::Done);
                };
                if !self.is_html_element(body, "body") || !self.frameset_ok {
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise, run the following steps:
                // 1. Remove the second element on the stack of open elements
                //    from its parent node, if it has one.
                // 2. Pop all the nodes from the bottom of the stack of open
                //    elements, from the current node up to, but not including,
                //    the root html element.
                // 3. Insert an HTML element for the token.
                // 4. Switch the insertion mode to "in frameset"."
                self.tree.detach(body)?;
                self.stack_of_open_elements.truncate(1);
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", ... "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                // of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token)?;
                // "If the next token is a U+000A LINE FEED (LF) character token,
                // then ignore that token and move on to the next one. (Newlines
                // at the start of pre blocks are ignored as an authoring
                // convenience.)"
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is a
                // parse error; ignore the token."
                let has_template = self.stack_contains("template");
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element. Insert an HTML element
                // for the token, and, if there is no template element on the
                // stack of open elements, set the form element pointer to point
                // to the element created."
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(token)?;
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => {
                self.close_list_item(&["li"]);
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is "plaintext""
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token)?;
                self.switch_tokenizer_to(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "If the stack of open elements has a button element in scope,
                // then run these substeps:
                // 1. Parse error.
                // 2. Generate implied end tags.
                // 3. Pop elements from the stack of open elements until a button
                //    element has been popped from the stack."
                if self.has_element_in_scope("button") {
                    self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag("button");
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on the
                // list (or the start of the list if there is no marker on the
                // list), then this is a parse error; run the adoption agency
                // algorithm for the token, then remove that element from the
                // list of active formatting elements and the stack of open
                // elements if the adoption agency algorithm didn't already
                // remove it (it might not have if the element is not in table
                // scope)."
                if let Some(existing) = self.active_formatting_element_after_last_marker("a") {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                    let _ = self.run_adoption_agency("a")?;
                    self.remove_from_active_formatting(existing);
                    self.remove_from_stack(existing);
                }
                self.insert_formatting_element(token)?;
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Push onto the list of active
            // formatting elements that element."
            _ if FORMATTING_ELEMENTS.contains(&name) && name != "nobr" => {
                self.insert_formatting_element(token)?;
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                self.reconstruct_active_formatting_elements()?;
                // "If the stack of open elements has a nobr element in scope,
                // then this is a parse error; run the adoption agency algorithm
                // for the token, then once again reconstruct the active
                // formatting elements, if any."
                if self.has_element_in_scope("nobr") {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                    let _ = self.run_adoption_agency("nobr")?;
                    self.reconstruct_active_formatting_elements()?;
                }
                self.insert_formatting_element(token)?;
            }

            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object""
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Insert a marker at the end of the list
            // of active formatting elements. Set the frameset-ok flag to "not
            // ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.push_formatting_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a p
                // element."
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(token, true)?;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                let hidden = token
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                self.insert_void_element(token, !hidden)?;
            }

            // "A start tag whose tag name is one of: "param", "source",
            // "track""
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.acknowledge_self_closing_flag();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
                let renamed = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                return self.handle_in_body_mode(&renamed);
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // "1. Insert an HTML element for the token.
                // 2. If the next token is a U+000A LINE FEED (LF) character
                //    token, then ignore that token and move on to the next one.
                // 3. Switch the tokenizer to the RCDATA state.
                // 4. Let the original insertion mode be the current insertion
                //    mode.
                // 5. Set the frameset-ok flag to "not ok".
                // 6. Switch the insertion mode to "text"."
                self.parse_generic_text_element(token, TokenizerState::RCDATA)?;
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements()?;
                self.frameset_ok = false;
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT)?;
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT)?;
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_generic_text_element(token, TokenizerState::RAWTEXT)?,
            "noscript" if self.options.scripting_enabled => {
                self.parse_generic_text_element(token, TokenizerState::RAWTEXT)?;
            }

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                let mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_mode(mode);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                    }
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the current
            // node is not now a rtc element or a ruby element, this is a parse
            // error."
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                    }
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is "math""
            // "Reconstruct the active formatting elements, if any. Adjust
            // MathML attributes for the token. Adjust foreign attributes for the
            // token. Insert a foreign element for the token, with MathML
            // namespace and false."
            "math" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_foreign_start_tag(name, attributes, self_closing, Namespace::MathMl)?;
            }

            // "A start tag whose tag name is "svg""
            "svg" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_foreign_start_tag(name, attributes, self_closing, Namespace::Svg)?;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            _ if IGNORED_START_TAGS.contains(&name) => {
                self.parse_error_with(ParseErrorCode::UnexpectedStartTag, name);
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                if self_closing && self.options.interpret_self_closing_anything_else {
                    let _ = self.stack_of_open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }
            }
        }
        Ok(ProcessResult::Done)
    }

    fn handle_in_body_end_tag(&mut self, name: &str) -> Result<ProcessResult> {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            "template" => return Ok(ProcessResult::UseRulesFor(InsertionMode::InHead)),

            // "An end tag whose tag name is "body""
            "body" => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.has_element_in_scope("body") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "Otherwise, if there is a node in the stack of open elements
                // that is not either a dd element, ... or the html element, then
                // this is a parse error."
                self.report_unclosed_elements(ParseErrorCode::UnexpectedEndTag);
                // "Switch the insertion mode to "after body"."
                self.switch_mode(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is "html""
            "html" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.report_unclosed_elements(ParseErrorCode::UnexpectedEndTag);
                // "Switch the insertion mode to "after body"."
                // "Reprocess the token."
                self.switch_mode(InsertionMode::AfterBody);
                return Ok(ProcessResult::Reprocess);
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            // "ul""
            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element with the same tag name as that
                // of the token, then this is a parse error; ignore the token."
                if !self.has_element_in_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                // "1. Generate implied end tags.
                // 2. If the current node is not an HTML element with the same tag
                //    name as that of the token, then this is a parse error.
                // 3. Pop elements from the stack of open elements until an HTML
                //    element with the same tag name as the token has been popped
                //    from the stack."
                self.close_element_in_scope(name, None);
            }

            // "An end tag whose tag name is "form""
            "form" => self.handle_form_end_tag(),

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML
                // element for a "p" start tag token with no attributes."
                if !self.has_element_in_button_scope("p") {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    let _ = self.insert_html_element_named("p")?;
                }
                // "Close a p element."
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            "li" => {
                // "If the stack of open elements does not have an li element in
                // list item scope, then this is a parse error; ignore the token."
                if !self.has_element_in_scope_of("li", Scope::ListItem) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.close_element_in_scope(name, Some(name));
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.has_element_in_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.close_element_in_scope(name, Some(name));
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !self.has_any_element_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                }
                // "Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4", "h5",
                // or "h6" has been popped from the stack."
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
            // "u""
            // "Run the adoption agency algorithm for the token."
            _ if FORMATTING_ELEMENTS.contains(&name) => {
                if self.run_adoption_agency(name)? == AdoptionOutcome::AnyOtherEndTag {
                    self.in_body_any_other_end_tag(name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(name) {
                    self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                    return Ok(ProcessResult::Done);
                }
                self.close_element_in_scope(name, None);
                // "Clear the list of active formatting elements up to the last
                // marker."
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            "br" => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                self.insert_void_element(&Token::start_tag("br", Vec::new()), true)?;
            }

            // "Any other end tag"
            _ => self.in_body_any_other_end_tag(name),
        }
        Ok(ProcessResult::Done)
    }

    /// The end tag branch shared by the block elements, `li`, `dd`/`dt` and
    /// `applet`/`marquee`/`object`: generate implied end tags (except
    /// `except`), report if the current node does not match, then pop
    /// through the element.
    fn close_element_in_scope(&mut self, name: &str, except: Option<&str>) {
        self.generate_implied_end_tags(except);
        if !self.current_node_is(name) {
            self.parse_error_with(ParseErrorCode::MisnestedTag, name);
        }
        self.pop_until_tag(name);
    }

    /// "An end tag whose tag name is "form""
    fn handle_form_end_tag(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.stack_contains("template") {
            // "1. Let node be the element that the form element pointer is set
            //    to, or null if it is not set to an element.
            // 2. Set the form element pointer to null."
            let node = self.form_element_pointer.take();
            // "3. If node is null or the stack of open elements does not have
            //    node in scope, then this is a parse error; return and ignore
            //    the token."
            let Some(node) = node.filter(|&node| self.has_node_in_scope(node)) else {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, "form");
                return;
            };
            // "4. Generate implied end tags.
            // 5. If the current node is not node, then this is a parse error.
            // 6. Remove node from the stack of open elements."
            self.generate_implied_end_tags(None);
            if self.current_node() != Some(node) {
                self.parse_error_with(ParseErrorCode::MisnestedTag, "form");
            }
            self.remove_from_stack(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:"
        // "1. If the stack of open elements does not have a form element in
        //    scope, then this is a parse error; return and ignore the token."
        if !self.has_element_in_scope("form") {
            self.parse_error_with(ParseErrorCode::UnexpectedEndTag, "form");
            return;
        }
        // "2. Generate implied end tags.
        // 3. If the current node is not a form element, then this is a parse
        //    error.
        // 4. Pop elements from the stack of open elements until a form element
        //    has been popped from the stack."
        self.close_element_in_scope("form", None);
    }

    /// Shared by the `li`, `dd` and `dt` start tags: close an open list item
    /// of one of `names` before a new one starts.
    fn close_list_item(&mut self, names: &[&str]) {
        // "1. Set the frameset-ok flag to "not ok".
        // 2. Initialize node to be the current node (the bottommost node of the
        //    stack)."
        self.frameset_ok = false;
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            // "3. Loop: If node is an li element, then run these substeps:
            //    1. Generate implied end tags, except for li elements.
            //    2. If the current node is not an li element, then this is a
            //       parse error.
            //    3. Pop elements from the stack of open elements until an li
            //       element has been popped from the stack.
            //    4. Jump to the step below labeled done."
            if self.is_html_element_in(node, names) {
                let Some(node_name) = self.tag_name(node).map(str::to_string) else {
                    break;
                };
                self.close_element_in_scope(&node_name, Some(&node_name));
                break;
            }
            // "4. If node is in the special category, but is not an address,
            //    div, or p element, then jump to the step below labeled done."
            if self.is_special_element(node) && !self.is_html_element_in(node, &["address", "div", "p"])
            {
                break;
            }
            // "5. Otherwise, set node to the previous entry in the stack of open
            //    elements and return to the step labeled loop."
        }
        // "6. Done: If the stack of open elements has a p element in button
        //    scope, then close a p element."
        self.close_p_element_in_button_scope();
    }

    /// Reconstruct, insert, and push onto the list of active formatting
    /// elements.
    fn insert_formatting_element(&mut self, token: &Token) -> Result<()> {
        self.reconstruct_active_formatting_elements()?;
        let element = self.insert_html_element(token)?;
        self.push_active_formatting_element(element, token.clone());
        Ok(())
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Immediately pop the current node off the stack of
    /// open elements. Acknowledge the token's self-closing flag, if it is set.
    /// Set the frameset-ok flag to "not ok"."
    fn insert_void_element(&mut self, token: &Token, clears_frameset_ok: bool) -> Result<()> {
        self.reconstruct_active_formatting_elements()?;
        let _ = self.insert_html_element(token)?;
        let _ = self.stack_of_open_elements.pop();
        self.acknowledge_self_closing_flag();
        if clears_frameset_ok {
            self.frameset_ok = false;
        }
        Ok(())
    }

    /// Copy attributes the element lacks. Used by stray `html` and `body` start
    /// tags.
    fn merge_attributes_into(&mut self, element: quill_dom::NodeId, attributes: &[Attribute]) {
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in attributes {
                let _ = data.attrs.insert_if_absent(attribute.clone());
            }
        }
    }

    /// "If there is a node in the stack of open elements that is not either a
    /// dd element, a dt element, an li element, an optgroup element, an option
    /// element, a p element, an rb element, an rp element, an rt element, an
    /// rtc element, a tbody element, a td element, a tfoot element, a th
    /// element, a thead element, a tr element, the body element, or the html
    /// element, then this is a parse error."
    pub(in crate::parser) fn report_unclosed_elements(&mut self, code: ParseErrorCode) {
        let unclosed = self
            .stack_of_open_elements
            .iter()
            .find(|&&id| !self.is_html_element_in(id, ALLOWED_OPEN_AT_END_OF_BODY))
            .and_then(|&id| self.tag_name(id))
            .map(str::to_string);
        if let Some(tag_name) = unclosed {
            self.parse_error_with(code, &tag_name);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    pub(in crate::parser) fn in_body_any_other_end_tag(&mut self, name: &str) {
        // "1. Initialize node to be the current node (the bottommost node of
        //    the stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            // "2. Loop: If node is an HTML element with the same tag name as the
            //    token, then:
            //    1. Generate implied end tags, except for HTML elements with the
            //       same tag name as the token.
            //    2. If node is not the current node, then this is a parse error.
            //    3. Pop all the nodes from the current node up to node,
            //       including node, then stop these steps."
            if self.is_html_element(node, name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error_with(ParseErrorCode::MisnestedTag, name);
                }
                self.pop_until_node(node);
                return;
            }
            // "3. Otherwise, if node is in the special category, then this is a
            //    parse error; ignore the token, and return."
            if self.is_special_element(node) {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
                return;
            }
            // "4. Set node to the previous entry in the stack of open elements.
            // 5. Return to the step labeled loop."
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data)?,

            // "An end-of-file token"
            // "Parse error."
            // "If the current node is a script element, then set its already
            // started to true."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ParseErrorCode::EofWithUnclosedElements);
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(self.original_insertion_mode);
                return Ok(ProcessResult::Reprocess);
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            // Scripts are never executed, so both entries reduce to the same
            // steps.
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(self.original_insertion_mode);
            }

            // The tokenizer only produces characters, end tags and EOF in the
            // text states.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.report_unexpected(token);
            }
        }
        Ok(ProcessResult::Done)
    }
}
