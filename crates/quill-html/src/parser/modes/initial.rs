//! The "initial", "before html" and "before head" insertion modes.

use quill_dom::{DocumentTypeData, NodeId, NodeType};

use super::super::core::{HTMLParser, InsertionMode, ProcessResult};
use super::super::quirks::{is_conforming_doctype, quirks_mode_for_doctype};
use super::is_whitespace;
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT))?,

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let name = name.as_deref();
                let public = public_identifier.as_deref();
                let system = system_identifier.as_deref();
                if !is_conforming_doctype(name, public, system) {
                    self.parse_error(ParseErrorCode::NonConformingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing; its public ID set to the
                // public identifier given in the DOCTYPE token, or the empty
                // string if the public identifier was missing; and its system
                // ID set to the system identifier given in the DOCTYPE token,
                // or the empty string if the system identifier was missing."
                let doctype = self.tree.alloc(NodeType::DocumentType(DocumentTypeData {
                    name: name.unwrap_or_default().to_string(),
                    public_id: public.unwrap_or_default().to_string(),
                    system_id: system.unwrap_or_default().to_string(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype)?;

                let mode = quirks_mode_for_doctype(name, public, system, *force_quirks);
                self.tree.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_mode(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a
            // parse error; if the parser cannot change the mode flag is false,
            // set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.parse_error(ParseErrorCode::MissingDoctype);
                self.tree.set_quirks_mode(quill_dom::QuirksMode::Quirks);
                self.switch_mode(InsertionMode::BeforeHtml);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment(data, Some(NodeId::ROOT))?,

            // "A character token that is one of ... whitespace"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag { name, .. } if name == "html" => {
                let _ = self.insert_html_element(token)?;
                self.switch_mode(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                // "Any other end tag"
                // "Parse error. Ignore the token."
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in the
            // stack of open elements."
            // "Switch the insertion mode to "before head", then reprocess the
            // token."
            _ => {
                let _ = self.insert_html_element_named("html")?;
                self.switch_mode(InsertionMode::BeforeHead);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is one of ... whitespace"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

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

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token)?;
                self.head_element_pointer = Some(head);
                self.switch_mode(InsertionMode::InHead);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error_with(ParseErrorCode::UnexpectedEndTag, name);
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no
            // attributes."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the current token."
            _ => {
                let head = self.insert_html_element_named("head")?;
                self.head_element_pointer = Some(head);
                self.switch_mode(InsertionMode::InHead);
                return Ok(ProcessResult::Reprocess);
            }
        }
        Ok(ProcessResult::Done)
    }
}
