//! DOM tree implementation for the Quill HTML parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parent and
//! sibling links are plain indices used for traversal and detachment checks; the
//! arena alone owns the nodes.
//!
//! Downstream consumers (selector engines, serializers, DOM adapters) only need
//! the read-only half of the API: [`DomTree::children`], [`DomTree::get`],
//! [`DomTree::as_element`] and the [`ElementData`] accessors.

mod attributes;
mod error;

pub use attributes::{Attribute, AttributesMap};
pub use error::DomError;

use strum_macros::Display;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 1.2.2 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// Element namespaces (HTML, MathML, SVG) and the attribute namespaces used by
/// foreign attribute adjustment (XLink, XML, XMLNS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Namespace {
    /// `http://www.w3.org/1999/xhtml`
    #[strum(serialize = "html")]
    Html,
    /// `http://www.w3.org/1998/Math/MathML`
    #[strum(serialize = "math")]
    MathMl,
    /// `http://www.w3.org/2000/svg`
    #[strum(serialize = "svg")]
    Svg,
    /// `http://www.w3.org/1999/xlink`
    #[strum(serialize = "xlink")]
    XLink,
    /// `http://www.w3.org/XML/1998/namespace`
    #[strum(serialize = "xml")]
    Xml,
    /// `http://www.w3.org/2000/xmlns/`
    #[strum(serialize = "xmlns")]
    Xmlns,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }
}

/// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#concept-document-mode)
///
/// "Unless stated otherwise, a document's mode is "no-quirks"."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Almost-standards mode.
    LimitedQuirks,
    /// Quirks mode.
    Quirks,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// Either null (detached, or the Document) or the single owning parent.
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DocumentTypeData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// "Doctypes have an associated name, public ID, and system ID."
///
/// Missing identifiers are stored as empty strings, as the DOM does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypeData {
    /// The doctype name, usually `html`.
    pub name: String,
    /// The public identifier.
    pub public_id: String,
    /// The system identifier.
    pub system_id: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name". Lowercase for HTML elements; SVG elements
    /// keep their adjusted camel case (`foreignObject`).
    pub tag_name: String,
    /// The element namespace.
    pub namespace: Namespace,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// An HTML-namespace element with the given attributes.
    #[must_use]
    pub fn html(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.into(),
            namespace: Namespace::Html,
            attrs,
        }
    }

    /// True when this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: Namespace, tag_name: &str) -> bool {
        self.namespace == namespace && self.tag_name == tag_name
    }

    /// True when this is an HTML element with the given local name.
    #[must_use]
    pub fn is_html(&self, tag_name: &str) -> bool {
        self.is(Namespace::Html, tag_name)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one contiguous vector and refer to each other by index.
/// A node that is removed from its parent stays allocated but detached.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-mode)
    quirks_mode: QuirksMode,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The document's quirks mode, as set from the doctype during parsing.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Set the document's quirks mode.
    pub const fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    fn check(&self, id: NodeId) -> Result<(), DomError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::NodeNotFound(id))
        }
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// Rejects insertions that would make `child` its own ancestor.
    fn ensure_insertion_validity(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if child == parent || self.is_descendant_of(parent, child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Recompute the sibling links of every child of `parent`.
    fn relink_children(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.prev_sibling = i.checked_sub(1).map(|prev| children[prev]);
            node.next_sibling = children.get(i + 1).copied();
        }
    }

    /// Remove `child` from whatever parent it has. Detached nodes are left as is.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if `child` was never allocated.
    pub fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        self.check(child)?;
        if let Some(parent) = self.nodes[child.0].parent {
            self.remove_child(parent, child)?;
        }
        Ok(())
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, first detaching it from
    /// any previous parent.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown or if `child` is an inclusive ancestor
    /// of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_insertion_validity(parent, child)?;
        self.detach(child)?;

        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].next_sibling = None;
        self.nodes[child.0].prev_sibling = prev_last_child;
        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
        Ok(())
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Insert `child` into `parent` immediately before `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] when `reference` is not currently a
    /// child of `parent`; the tree is left untouched in that case.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_insertion_validity(parent, child)?;
        self.check(reference)?;
        if self.nodes[reference.0].parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if child == reference {
            return Ok(());
        }
        self.detach(child)?;

        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference)
            .ok_or(DomError::NotAChild {
                parent,
                child: reference,
            })?;
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        self.relink_children(parent);
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detach `child` from `parent`. The node stays allocated.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] when `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        let _ = self.nodes[parent.0].children.remove(position);

        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.next_sibling = None;
        node.prev_sibling = None;
        self.relink_children(parent);
        Ok(())
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown or if `to` lives inside `from`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        self.check(from)?;
        self.check(to)?;
        if to == from {
            return Ok(());
        }
        if self.is_descendant_of(to, from) {
            return Err(DomError::HierarchyRequest {
                parent: to,
                child: from,
            });
        }
        let moved = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &moved {
            let node = &mut self.nodes[child.0];
            node.parent = Some(to);
        }
        self.nodes[to.0].children.extend(moved);
        self.relink_children(to);
        Ok(())
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated data of all Text descendants, in tree order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(data)) => out.push_str(data),
            Some(NodeType::Element(_) | NodeType::Document) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-doctype)
    ///
    /// The document's doctype node, if any.
    #[must_use]
    pub fn doctype(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| {
                matches!(
                    self.get(id).map(|n| &n.node_type),
                    Some(NodeType::DocumentType(_))
                )
            })
            .copied()
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.is_html("body") || e.is_html("frameset"))
            })
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
