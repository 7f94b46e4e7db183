//! MathML foreign content support.
//!
//! [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "When the steps below require the user agent to adjust MathML attributes for
/// a token, then, if the token has an attribute named definitionurl, change
/// its name to definitionURL (note the case difference)."
pub fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut().filter(|attr| attr.name == "definitionurl") {
        attr.name = "definitionURL".to_string();
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element, A
/// MathML ms element, A MathML mtext element"
#[must_use]
pub fn is_text_integration_point_name(tag_name: &str) -> bool {
    matches!(tag_name, "mi" | "mo" | "mn" | "ms" | "mtext")
}
