//! Node creation and insertion.
//!
//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use quill_dom::{AttributesMap, ElementData, Namespace, NodeId, NodeType};

use super::core::HTMLParser;
use crate::error::{HtmlError, Result};
use crate::tokenizer::{Attribute, Token};

/// "The appropriate place for inserting a node": inside `parent`, before
/// `before` or at the end when `before` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InsertionLocation {
    pub parent: NodeId,
    pub before: Option<NodeId>,
}

impl InsertionLocation {
    const fn at_end_of(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

impl HTMLParser {
    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target, is the position in an element returned by
    /// running the following steps"
    pub(super) fn appropriate_place_for_inserting(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target
        // be the override target. Otherwise, let target be the current node."
        let Some(target) = override_target.or_else(|| self.current_node()) else {
            return InsertionLocation::at_end_of(NodeId::ROOT);
        };

        // STEP 2: "If foster parenting is enabled and target is a table,
        // tbody, tfoot, thead, or tr element"
        if self.foster_parenting
            && self.is_html_element_in(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        // its last child (if any)."
        //
        // STEP 3: "If the adjusted insertion location is inside a template
        // element, let it instead be inside the template element's template
        // contents". Template contents are the template's own children here.
        InsertionLocation::at_end_of(target)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of "appropriate place for inserting a node".
    fn foster_parent_location(&self) -> InsertionLocation {
        // STEP 2.1: "Let last template be the last template element in the
        // stack of open elements, if any."
        let last_template = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "template"));

        // STEP 2.2: "Let last table be the last table element in the stack of
        // open elements, if any."
        let last_table = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        // STEP 2.3: "If there is a last template and either there is no last
        // table, or there is one, but last template is lower (more recently
        // added) than last table in the stack of open elements, then: let
        // adjusted insertion location be inside last template's template
        // contents, after its last child (if any), and abort these steps."
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            return InsertionLocation::at_end_of(self.stack_of_open_elements[template_index]);
        }

        // STEP 2.4: "If there is no last table, then let adjusted insertion
        // location be inside the first element in the stack of open elements
        // (the html element), after its last child (if any), and abort these
        // steps. (fragment case)"
        let Some(table_index) = last_table else {
            let html = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            return InsertionLocation::at_end_of(html);
        };
        let last_table = self.stack_of_open_elements[table_index];

        // STEP 2.5: "If last table has a parent node, then let adjusted
        // insertion location be inside last table's parent node, immediately
        // before last table, and abort these steps."
        if let Some(parent) = self.tree.parent(last_table) {
            return InsertionLocation {
                parent,
                before: Some(last_table),
            };
        }

        // STEP 2.6: "Let previous element be the element immediately above
        // last table in the stack of open elements."
        // STEP 2.7: "Let adjusted insertion location be inside previous
        // element, after its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);
        InsertionLocation::at_end_of(previous)
    }

    /// Put an already created node at `location`.
    pub(super) fn insert_node_at(&mut self, location: InsertionLocation, node: NodeId) -> Result<()> {
        match location.before {
            Some(reference) => self.tree.insert_before(location.parent, node, reference)?,
            None => self.tree.append_child(location.parent, node)?,
        }
        Ok(())
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Allocates a detached element. Scripting, custom elements and form
    /// association have no effect on the tree shape and are not modelled.
    pub(super) fn create_element_for_token(
        &mut self,
        tag_name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> NodeId {
        let attrs: AttributesMap = attributes.iter().cloned().collect();
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            namespace,
            attrs,
        }))
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "When the steps below require the user agent to insert a foreign element
    /// for a token in a given namespace and with a boolean
    /// onlyAddToElementStack"
    pub(super) fn insert_foreign_element(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
        only_add_to_element_stack: bool,
    ) -> Result<NodeId> {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 2: "Let element be the result of creating an element for the
        // token in the given namespace, with the intended parent being the
        // element in which the adjusted insertion location finds itself."
        let element = self.create_element_for_token(tag_name, namespace, attributes);

        // STEP 3: "If onlyAddToElementStack is false, then run insert an
        // element at the adjusted insertion location with element."
        if !only_add_to_element_stack {
            self.insert_node_at(location, element)?;
        }

        // STEP 4: "Push element onto the stack of open elements so that it is
        // the new current node."
        self.stack_of_open_elements.push(element);

        // STEP 5: "Return element."
        Ok(element)
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the
    /// token, with the HTML namespace and false."
    pub(super) fn insert_html_element(&mut self, token: &Token) -> Result<NodeId> {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return Err(HtmlError::InvariantViolation(
                "inserted an HTML element for a non-start-tag token",
            ));
        };
        self.insert_foreign_element(name, attributes, Namespace::Html, false)
    }

    /// Insert an HTML element for a start tag synthesised by the parser, such
    /// as the implied `head` or `body`.
    pub(super) fn insert_html_element_named(&mut self, tag_name: &str) -> Result<NodeId> {
        self.insert_foreign_element(tag_name, &[], Namespace::Html, false)
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) -> Result<()> {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        // node, then ignore the token."
        if location.parent == NodeId::ROOT {
            return Ok(());
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        // insertion location, then append data to that Text node's data."
        let preceding = match location.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(location.parent),
        };
        if let Some(text_id) = preceding
            && let Some(node) = self.tree.get_mut(text_id)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push(c);
            return Ok(());
        }

        // "Otherwise, create a new Text node whose data is data and whose node
        // document is the same as that of the element in which the adjusted
        // insertion location finds itself, and insert the newly created node
        // at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.insert_node_at(location, text)
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "When the steps below require the user agent to insert a comment while
    /// processing a comment token, optionally with an explicitly insertion
    /// position position" ... "If position was specified, then let the
    /// adjusted insertion location be position. Otherwise, let adjusted
    /// insertion location be the appropriate place for inserting a node."
    pub(super) fn insert_comment(&mut self, data: &str, position: Option<NodeId>) -> Result<()> {
        let location = position.map_or_else(
            || self.appropriate_place_for_inserting(None),
            InsertionLocation::at_end_of,
        );
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_node_at(location, comment)
    }
}
