//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use quill_dom::{Namespace, NodeId};

use super::core::{HTMLParser, ProcessResult};
use crate::error::{ParseErrorCode, Result};
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a
/// namespaced attribute, with the prefix being the string in the second
/// column, the local name being the string in the third column, and the
/// namespace being the namespace in the fourth column."
///
/// The qualified name is unchanged, so only the namespace is recorded.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Namespace)] = &[
    ("xlink:actuate", Namespace::XLink),
    ("xlink:arcrole", Namespace::XLink),
    ("xlink:href", Namespace::XLink),
    ("xlink:role", Namespace::XLink),
    ("xlink:show", Namespace::XLink),
    ("xlink:title", Namespace::XLink),
    ("xlink:type", Namespace::XLink),
    ("xml:lang", Namespace::Xml),
    ("xml:space", Namespace::Xml),
    ("xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Namespace::Xmlns),
];

/// Start tags that break out of foreign content back into HTML.
const BREAKOUT_START_TAGS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Place `xlink:*`, `xml:*` and `xmlns` attributes in their namespaces.
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in &mut *attributes {
        if let Some(&(_, namespace)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|(name, _)| attr.name == *name)
        {
            attr.namespace = Some(namespace);
        }
    }
}

impl HTMLParser {
    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    fn is_mathml_text_integration_point(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            e.namespace == Namespace::MathMl && mathml::is_text_integration_point_name(&e.tag_name)
        })
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A node is an HTML integration point if it is one of the following
    /// elements:
    /// - A MathML annotation-xml element whose start tag token had an attribute
    ///   with the name "encoding" whose value was an ASCII case-insensitive
    ///   match for the string "text/html"
    /// - A MathML annotation-xml element whose start tag token had an attribute
    ///   with the name "encoding" whose value was an ASCII case-insensitive
    ///   match for the string "application/xhtml+xml"
    /// - An SVG foreignObject element
    /// - An SVG desc element
    /// - An SVG title element"
    fn is_html_integration_point(&self, id: NodeId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        match element.namespace {
            Namespace::MathMl if element.tag_name == "annotation-xml" => {
                element.attrs.get("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
            }
            Namespace::Svg => matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher". True when the token goes to the rules for
    /// parsing tokens in foreign content.
    pub(super) fn use_foreign_content_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return false;
        };
        let Some(element) = self.element(node) else {
            return false;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return false;
        }
        let start_tag_name = match token {
            Token::StartTag { name, .. } => Some(name.as_str()),
            _ => None,
        };
        let is_character = matches!(token, Token::Character { .. });

        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark""
        // "If the adjusted current node is a MathML text integration point and
        // the token is a character token"
        if self.is_mathml_text_integration_point(node)
            && (is_character
                || start_tag_name.is_some_and(|name| name != "mglyph" && name != "malignmark"))
        {
            return false;
        }
        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if element.is(Namespace::MathMl, "annotation-xml") && start_tag_name == Some("svg") {
            return false;
        }
        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        // token is a character token"
        if self.is_html_integration_point(node) && (is_character || start_tag_name.is_some()) {
            return false;
        }
        // "If the token is an end-of-file token"
        !token.is_eof()
    }

    /// Insert a foreign element for a start tag after the attribute (and, for
    /// SVG, tag name) adjustments, popping it again if it was self-closing.
    pub(super) fn insert_foreign_start_tag(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        self_closing: bool,
        namespace: Namespace,
    ) -> Result<()> {
        let mut attributes = attributes.to_vec();
        let tag_name = match namespace {
            Namespace::MathMl => {
                adjust_mathml_attributes(&mut attributes);
                tag_name
            }
            Namespace::Svg => {
                adjust_svg_attributes(&mut attributes);
                adjust_svg_tag_name(tag_name)
            }
            _ => tag_name,
        };
        adjust_foreign_attributes(&mut attributes);
        let _ = self.insert_foreign_element(tag_name, &attributes, namespace, false)?;

        // "If the token has its self-closing flag set, then run the appropriate
        // steps from the following list:
        // - If the token's tag name is "script", and the new current node is in
        //   the SVG namespace: Acknowledge the token's self-closing flag, and
        //   then act as described in the steps for a "script" end tag below.
        // - Otherwise: Pop the current node off the stack of open elements and
        //   acknowledge the token's self-closing flag."
        // SVG scripts are never run, so both reduce to popping.
        if self_closing {
            let _ = self.stack_of_open_elements.pop();
            self.acknowledge_self_closing_flag();
        }
        Ok(())
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn process_in_foreign_content(&mut self, token: &Token) -> Result<ProcessResult> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.insert_character('\u{FFFD}')?;
            }

            // "A character token that is one of ... whitespace"
            // "Insert the token's character."
            Token::Character { data } if matches!(data, '\t' | '\n' | '\x0C' | '\r' | ' ') => {
                self.insert_character(*data)?;
            }

            // "Any other character token"
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data)?;
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None)?,

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype),

            // "A start tag whose tag name is one of: "b", "big", ... "var""
            // "A start tag whose tag name is "font", if the token has any
            // attributes named "color", "face", or "size""
            // "An end tag whose tag name is "br", "p""
            Token::StartTag { name, .. }
                if BREAKOUT_START_TAGS.contains(&name.as_str())
                    || (name == "font"
                        && ["color", "face", "size"]
                            .iter()
                            .any(|attr| token.attribute(attr).is_some())) =>
            {
                return Ok(self.break_out_of_foreign_content(name));
            }
            Token::EndTag { name, .. } if matches!(name.as_str(), "br" | "p") => {
                return Ok(self.break_out_of_foreign_content(name));
            }

            // "Any other start tag"
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                // "If the adjusted current node is an element in the MathML
                // namespace, adjust MathML attributes for the token."
                // "If the adjusted current node is an element in the SVG
                // namespace, and the token's tag name is one of the ones in the
                // first column of the following table, change the tag name to
                // the name given in the corresponding cell in the second column."
                // "If the adjusted current node is an element in the SVG
                // namespace, adjust SVG attributes for the token."
                // "Adjust foreign attributes for the token."
                // "Insert a foreign element for the token, with adjusted current
                // node's namespace and false."
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|id| self.element(id))
                    .map_or(Namespace::Html, |e| e.namespace);
                self.insert_foreign_start_tag(name, attributes, *self_closing, namespace)?;
            }

            // "An end tag whose tag name is "script", if the current node is an
            // SVG script element"
            // "Any other end tag"
            Token::EndTag { name, .. } => return Ok(self.foreign_content_end_tag(name)),

            // The dispatcher never routes end-of-file here.
            Token::EndOfFile => {}
        }
        Ok(ProcessResult::Done)
    }

    /// "Parse error."
    /// "While the current node is not a MathML text integration point, an HTML
    /// integration point, or an element in the HTML namespace, pop elements
    /// from the stack of open elements."
    /// "Reprocess the token according to the rules given in the section
    /// corresponding to the current insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, tag_name: &str) -> ProcessResult {
        self.parse_error_with(ParseErrorCode::UnexpectedHtmlElementInForeignContent, tag_name);
        while let Some(current) = self.current_node() {
            let is_html = self
                .element(current)
                .is_some_and(|e| e.namespace == Namespace::Html);
            if is_html
                || self.is_mathml_text_integration_point(current)
                || self.is_html_integration_point(current)
            {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
        ProcessResult::UseRulesFor(self.insertion_mode)
    }

    /// "Any other end tag" in foreign content.
    fn foreign_content_end_tag(&mut self, tag_name: &str) -> ProcessResult {
        let name_matches = |parser: &Self, id: NodeId| {
            parser
                .tag_name(id)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag_name))
        };

        // "1. Initialize node to be the current node (the bottommost node of
        //    the stack).
        // 2. If node's tag name, converted to ASCII lowercase, is not the same
        //    as the tag name of the token, then this is a parse error."
        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return ProcessResult::Done;
        };
        if !name_matches(self, self.stack_of_open_elements[index]) {
            self.parse_error_with(ParseErrorCode::UnexpectedEndTag, tag_name);
        }

        loop {
            let node = self.stack_of_open_elements[index];
            // "3. Loop: If node is the topmost element in the stack of open
            //    elements, then return. (fragment case)"
            if index == 0 {
                return ProcessResult::Done;
            }
            // "4. If node's tag name, converted to ASCII lowercase, is the same
            //    as the tag name of the token, pop elements from the stack of
            //    open elements until node has been popped from the stack, and
            //    then return."
            if name_matches(self, node) {
                self.pop_until_node(node);
                return ProcessResult::Done;
            }
            // "5. Set node to the previous entry in the stack of open elements."
            index -= 1;
            // "6. If node is not an element in the HTML namespace, return to the
            //    step labeled loop.
            // 7. Otherwise, process the token according to the rules given in
            //    the section corresponding to the current insertion mode in HTML
            //    content."
            let is_html = self
                .element(self.stack_of_open_elements[index])
                .is_some_and(|e| e.namespace == Namespace::Html);
            if is_html {
                return ProcessResult::UseRulesFor(self.insertion_mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_attributes_get_namespaces() {
        let mut attrs = vec![
            Attribute::new("xlink:href", "#a"),
            Attribute::new("xmlns", "http://www.w3.org/2000/svg"),
            Attribute::new("href", "#b"),
        ];
        adjust_foreign_attributes(&mut attrs);
        assert_eq!(attrs[0].namespace, Some(Namespace::XLink));
        assert_eq!(attrs[0].local_name(), "href");
        assert_eq!(attrs[1].namespace, Some(Namespace::Xmlns));
        assert_eq!(attrs[1].local_name(), "xmlns");
        assert_eq!(attrs[2].namespace, None);
    }

    #[test]
    fn mathml_definition_url() {
        let mut attrs = vec![Attribute::new("definitionurl", "x")];
        adjust_mathml_attributes(&mut attrs);
        assert_eq!(attrs[0].name, "definitionURL");
    }
}
