//! [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs mis-nested formatting elements such as `<b><i></b></i>`.

use quill_dom::NodeId;

use super::core::{ActiveFormattingElement, HTMLParser};
use crate::error::{HtmlError, ParseErrorCode, Result};
use crate::tokenizer::Token;

/// Upper bound of the outer loop.
const OUTER_LOOP_LIMIT: usize = 8;
/// Past this many inner loop passes, nodes are dropped from the list of active
/// formatting elements instead of being cloned.
const INNER_LOOP_LIMIT: usize = 3;

/// How the end tag that triggered the algorithm should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AdoptionOutcome {
    /// The end tag has been handled.
    Done,
    /// "act as described in the 'any other end tag' entry"
    AnyOtherEndTag,
}

impl HTMLParser {
    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "The adoption agency algorithm, which takes as its only argument a token
    /// token for which the algorithm is being run, consists of the following
    /// steps"
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> Result<AdoptionOutcome> {
        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active
        // formatting elements, then pop the current node off the stack of open
        // elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && self.active_formatting_position(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return Ok(AdoptionOutcome::Done);
        }

        // STEP 3-6: "Outer loop"
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 7: "Let formatting element be the last element in the list
            // of active formatting elements that: is between the end of the
            // list and the last marker in the list, if any, or the start of the
            // list otherwise, and has the tag name subject."
            // STEP 8: "If there is no such element, then return and instead act
            // as described in the "any other end tag" entry above."
            let Some(formatting_element) = self.active_formatting_element_after_last_marker(subject)
            else {
                return Ok(AdoptionOutcome::AnyOtherEndTag);
            };

            // STEP 9: "If formatting element is not in the stack of open
            // elements, then this is a parse error; remove the element from the
            // list, and return."
            let Some(formatting_stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error_with(ParseErrorCode::AdoptionAgencyRepair, subject);
                self.remove_from_active_formatting(formatting_element);
                return Ok(AdoptionOutcome::Done);
            };

            // STEP 10: "If formatting element is in the stack of open elements,
            // but the element is not in scope, then this is a parse error;
            // return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error_with(ParseErrorCode::AdoptionAgencyRepair, subject);
                return Ok(AdoptionOutcome::Done);
            }

            // STEP 11: "If formatting element is not the current node, this is
            // a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error_with(ParseErrorCode::AdoptionAgencyRepair, subject);
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of
            // open elements that is lower in the stack than formatting element,
            // and is an element in the special category. There might not be
            // one."
            let furthest_block_index = (formatting_stack_index + 1
                ..self.stack_of_open_elements.len())
                .find(|&i| self.is_special_element(self.stack_of_open_elements[i]));

            // STEP 13: "If there is no furthest block, then the UA must first
            // pop all the nodes from the bottom of the stack of open elements,
            // from the current node up to and including formatting element,
            // then remove formatting element from the list of active formatting
            // elements, and finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                self.remove_from_active_formatting(formatting_element);
                return Ok(AdoptionOutcome::Done);
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // STEP 14: "Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            let common_ancestor = formatting_stack_index
                .checked_sub(1)
                .map(|i| self.stack_of_open_elements[i])
                .ok_or(HtmlError::InvariantViolation(
                    "formatting element at the bottom of the stack",
                ))?;

            // STEP 15: "Let a bookmark note the position of formatting element
            // in the list of active formatting elements relative to the
            // elements on either side of it in the list."
            let mut bookmark = self
                .active_formatting_position(formatting_element)
                .ok_or(HtmlError::InvariantViolation(
                    "formatting element missing from the active list",
                ))?;

            // STEP 16: "Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 17-18: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in
                // the stack of open elements, or if node is no longer in the
                // stack of open elements (e.g. because it got removed by this
                // algorithm), the element that was immediately above node in
                // the stack of open elements before node was removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than 3 and node
                // is in the list of active formatting elements, then remove node
                // from the list of active formatting elements."
                if inner_loop_counter > INNER_LOOP_LIMIT
                    && let Some(index) = self.active_formatting_position(node)
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                }

                // STEP 18.5: "If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(node_afe_index) = self.active_formatting_position(node) else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the
                // element node was created, in the HTML namespace, with common
                // ancestor as the intended parent; replace the entry for node in
                // the list of active formatting elements with an entry for the
                // new element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be
                // the new element."
                let token = self.formatting_token_at(node_afe_index)?;
                let new_node = self.create_element_for_formatting_token(&token)?;
                self.active_formatting_elements[node_afe_index] = ActiveFormattingElement::Element {
                    node_id: new_node,
                    token,
                };
                self.stack_of_open_elements[node_index] = new_node;

                // STEP 18.7: "If last node is furthest block, then move the
                // aforementioned bookmark to be immediately after the new node
                // in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_afe_index + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.tree.append_child(new_node, last_node)?;

                // STEP 18.9: "Set last node to node."
                last_node = new_node;
            }

            // STEP 19: "Insert whatever last node ended up being in the previous
            // step at the appropriate place for inserting a node, but using
            // common ancestor as the override target."
            self.tree.detach(last_node)?;
            let location = self.appropriate_place_for_inserting(Some(common_ancestor));
            self.insert_node_at(location, last_node)?;

            // STEP 20: "Create an element for the token for which formatting
            // element was created, in the HTML namespace, with furthest block as
            // the intended parent."
            let formatting_afe_index = self
                .active_formatting_position(formatting_element)
                .ok_or(HtmlError::InvariantViolation(
                    "formatting element missing from the active list",
                ))?;
            let token = self.formatting_token_at(formatting_afe_index)?;
            let new_element = self.create_element_for_formatting_token(&token)?;

            // STEP 21: "Take all of the child nodes of furthest block and append
            // them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element)?;

            // STEP 22: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element)?;

            // STEP 23: "Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            let _ = self.active_formatting_elements.remove(formatting_afe_index);
            if bookmark > formatting_afe_index {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // STEP 24: "Remove formatting element from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthest block in that
            // stack."
            self.remove_from_stack(formatting_element);
            let furthest_block_position = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
                .ok_or(HtmlError::InvariantViolation(
                    "furthest block left the stack of open elements",
                ))?;
            self.stack_of_open_elements
                .insert(furthest_block_position + 1, new_element);
        }

        // STEP 4.2: "If outer loop counter is greater than or equal to 8, then
        // return."
        Ok(AdoptionOutcome::Done)
    }

    fn formatting_token_at(&self, index: usize) -> Result<Token> {
        match self.active_formatting_elements.get(index) {
            Some(ActiveFormattingElement::Element { token, .. }) => Ok(token.clone()),
            _ => Err(HtmlError::InvariantViolation(
                "expected a formatting element entry",
            )),
        }
    }

    fn create_element_for_formatting_token(&mut self, token: &Token) -> Result<NodeId> {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => Ok(self.create_element_for_token(name, quill_dom::Namespace::Html, attributes)),
            _ => Err(HtmlError::InvariantViolation(
                "formatting entry without a start tag",
            )),
        }
    }
}
