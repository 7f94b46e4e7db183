//! The context element for fragment parsing.

use core::fmt;
use core::str::FromStr;

use quill_dom::{Attribute, Namespace};

use crate::error::HtmlError;
use crate::tokenizer::TokenizerState;

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// The element a fragment is parsed "inside of". It never appears in the
/// resulting fragment; it only decides the initial tokenizer state and
/// insertion mode.
///
/// Parsed from the html5lib notation: `div`, `svg path` or `math:mi`.
///
/// ```
/// use quill_html::ContextElement;
/// use quill_dom::Namespace;
///
/// let context: ContextElement = "svg path".parse().unwrap();
/// assert_eq!(context.namespace(), Namespace::Svg);
/// assert_eq!(context.tag_name(), "path");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextElement {
    tag_name: String,
    namespace: Namespace,
    attributes: Vec<Attribute>,
}

impl ContextElement {
    /// A context element in the given namespace.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.into(),
            namespace,
            attributes: Vec::new(),
        }
    }

    /// An HTML context element.
    #[must_use]
    pub fn html(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Namespace::Html)
    }

    /// An SVG context element.
    #[must_use]
    pub fn svg(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Namespace::Svg)
    }

    /// A MathML context element.
    #[must_use]
    pub fn mathml(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Namespace::MathMl)
    }

    /// Attach attributes. Only `encoding` on MathML `annotation-xml` changes
    /// how the fragment is parsed.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Local name of the context element.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Namespace of the context element.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Attributes of the context element.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// True for an HTML element with this local name.
    #[must_use]
    pub fn is_html(&self, tag_name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name == tag_name
    }

    /// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// STEP 8: "Set the state of the HTML parser's tokenization stage as
    /// follows, switching on the context element:
    /// - title, textarea: Switch the tokenizer to the RCDATA state.
    /// - style, xmp, iframe, noembed, noframes: Switch the tokenizer to the
    ///   RAWTEXT state.
    /// - script: Switch the tokenizer to the script data state.
    /// - noscript: If the scripting flag is enabled, switch the tokenizer to
    ///   the RAWTEXT state. Otherwise, leave the tokenizer in the data state.
    /// - plaintext: Switch the tokenizer to the PLAINTEXT state.
    /// - Any other element: Leave the tokenizer in the data state."
    #[must_use]
    pub fn tokenizer_state(&self, scripting_enabled: bool) -> TokenizerState {
        if self.namespace != Namespace::Html {
            return TokenizerState::Data;
        }
        match self.tag_name.as_str() {
            "title" | "textarea" => TokenizerState::RCDATA,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RAWTEXT,
            "script" => TokenizerState::ScriptData,
            "noscript" if scripting_enabled => TokenizerState::RAWTEXT,
            "plaintext" => TokenizerState::PLAINTEXT,
            _ => TokenizerState::Data,
        }
    }
}

impl FromStr for ContextElement {
    type Err = HtmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, tag_name) = match s.split_once([' ', ':']) {
            Some(("svg", name)) => (Namespace::Svg, name.trim()),
            Some(("math", name)) => (Namespace::MathMl, name.trim()),
            Some(("html", name)) => (Namespace::Html, name.trim()),
            _ => (Namespace::Html, s),
        };
        if tag_name.is_empty() || tag_name.contains(char::is_whitespace) {
            return Err(HtmlError::UnknownContextElement(s.to_string()));
        }
        Ok(Self::new(tag_name, namespace))
    }
}

impl fmt::Display for ContextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Namespace::Html => f.write_str(&self.tag_name),
            namespace => write!(f, "{namespace} {}", self.tag_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_html5lib_notation() {
        let div: ContextElement = "div".parse().unwrap();
        assert!(div.is_html("div"));

        let path: ContextElement = "svg path".parse().unwrap();
        assert_eq!(path.namespace(), Namespace::Svg);
        assert_eq!(path.tag_name(), "path");

        let mi: ContextElement = "math:mi".parse().unwrap();
        assert_eq!(mi.namespace(), Namespace::MathMl);
        assert_eq!(mi.to_string(), "math mi");
    }

    #[test]
    fn rejects_empty_names() {
        assert!("".parse::<ContextElement>().is_err());
        assert!("svg ".parse::<ContextElement>().is_err());
    }

    #[test]
    fn raw_text_contexts() {
        assert_eq!(
            ContextElement::html("textarea").tokenizer_state(true),
            TokenizerState::RCDATA
        );
        assert_eq!(
            ContextElement::html("noscript").tokenizer_state(true),
            TokenizerState::RAWTEXT
        );
        assert_eq!(
            ContextElement::html("noscript").tokenizer_state(false),
            TokenizerState::Data
        );
        assert_eq!(
            ContextElement::new("title", Namespace::Svg).tokenizer_state(true),
            TokenizerState::Data
        );
    }
}
