//! The list of active formatting elements.
//!
//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use quill_dom::NodeId;

use super::core::{ActiveFormattingElement, HTMLParser};
use crate::error::Result;
use crate::tokenizer::Token;

/// "a, b, big, code, em, font, i, nobr, s, small, strike, strong, tt, and u"
pub(super) const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

impl HTMLParser {
    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "When the steps below require the UA to push onto the list of active
    /// formatting elements an element element, the UA must perform the
    /// following steps:
    ///
    /// 1. If there are already three elements in the list of active formatting
    ///    elements after the last marker, if any, or anywhere in the list if
    ///    there are no markers, that have the same tag name, namespace, and
    ///    attributes as element, then remove the earliest such element from
    ///    the list of active formatting elements. For these purposes, the
    ///    attributes must be compared as they were when the elements were
    ///    created by the parser; two elements have the same attributes if all
    ///    their parsed attributes can be paired such that the two attributes
    ///    in each pair have identical names, namespaces, and values (the order
    ///    of the attributes does not matter).
    ///
    /// 2. Add element to the list of active formatting elements."
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: Token) {
        let mut matching = Vec::new();
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { token: existing, .. } => {
                    if same_tag_and_attributes(existing, &token) {
                        matching.push(index);
                    }
                }
            }
        }
        // `matching` runs newest to oldest.
        if matching.len() >= 3
            && let Some(&earliest) = matching.last()
        {
            let _ = self.active_formatting_elements.remove(earliest);
        }
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element { node_id, token });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn push_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements.
    /// 2. Remove entry from the list of active formatting elements.
    /// 3. If entry was a marker, then stop the algorithm at this point.
    /// 4. Go to step 1."
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// Index of `node_id` in the list of active formatting elements.
    pub(super) fn active_formatting_position(&self, node_id: NodeId) -> Option<usize> {
        self.active_formatting_elements.iter().position(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id: id, .. } if *id == node_id)
        })
    }

    /// Remove `node_id` from the list of active formatting elements, if present.
    pub(super) fn remove_from_active_formatting(&mut self, node_id: NodeId) {
        if let Some(index) = self.active_formatting_position(node_id) {
            let _ = self.active_formatting_elements.remove(index);
        }
    }

    /// The last element with this tag name between the end of the list and the
    /// last marker.
    pub(super) fn active_formatting_element_after_last_marker(
        &self,
        tag_name: &str,
    ) -> Option<NodeId> {
        for entry in self.active_formatting_elements.iter().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, token } => {
                    if token.tag_name() == Some(tag_name) {
                        return Some(*node_id);
                    }
                }
            }
        }
        None
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps"
    pub(super) fn reconstruct_active_formatting_elements(&mut self) -> Result<()> {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of
        // active formatting elements is a marker, or if it is an element that
        // is in the stack of open elements, then there is nothing to
        // reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting_elements.len().checked_sub(1) else {
            return Ok(());
        };
        if self.is_marker_or_open(last) {
            return Ok(());
        }

        // STEP 3-6 "Rewind": walk back to the entry after the last marker or
        // open element.
        let mut index = last;
        while index > 0 {
            if self.is_marker_or_open(index - 1) {
                break;
            }
            index -= 1;
        }

        // STEP 7-10 "Advance" / "Create": recreate each entry from there on.
        for entry_index in index..self.active_formatting_elements.len() {
            let ActiveFormattingElement::Element { token, .. } =
                &self.active_formatting_elements[entry_index]
            else {
                continue;
            };
            // STEP 8: "Create: Insert an HTML element for the token for which
            // the element entry was created, to obtain new element."
            let token = token.clone();
            let new_element = self.insert_html_element(&token)?;
            // STEP 9: "Replace the entry for entry in the list with an entry
            // for new element."
            self.active_formatting_elements[entry_index] = ActiveFormattingElement::Element {
                node_id: new_element,
                token,
            };
        }
        Ok(())
    }

    fn is_marker_or_open(&self, index: usize) -> bool {
        match &self.active_formatting_elements[index] {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { node_id, .. } => self.is_on_stack(*node_id),
        }
    }
}

/// Same tag name and the same set of attributes, in any order.
fn same_tag_and_attributes(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (
            Token::StartTag {
                name: a_name,
                attributes: a_attrs,
                ..
            },
            Token::StartTag {
                name: b_name,
                attributes: b_attrs,
                ..
            },
        ) => {
            a_name == b_name
                && a_attrs.len() == b_attrs.len()
                && a_attrs.iter().all(|a_attr| {
                    b_attrs.iter().any(|b_attr| {
                        a_attr.name == b_attr.name
                            && a_attr.namespace == b_attr.namespace
                            && a_attr.value == b_attr.value
                    })
                })
        }
        _ => false,
    }
}
