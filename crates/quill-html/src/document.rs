//! Parse results.

use quill_dom::{DomTree, NodeId, QuirksMode};

use crate::error::ParseError;
use crate::parser::dump_tree;

/// A parsed document: the tree plus every parse error raised on the way.
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    errors: Vec<ParseError>,
}

impl Document {
    pub(crate) const fn new(tree: DomTree, errors: Vec<ParseError>) -> Self {
        Self { tree, errors }
    }

    /// The DOM tree. `NodeId::ROOT` is the Document node.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Take ownership of the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// Parse errors in the order they were raised. Empty when the parser ran
    /// with `keep_errors` off.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-mode)
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.tree.quirks_mode()
    }

    /// The `html` element, if the document has one.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.document_element()
    }

    /// The html5lib-format dump of the whole document.
    #[must_use]
    pub fn dump(&self) -> String {
        dump_tree(&self.tree)
    }
}

/// The result of fragment parsing: the root's children, held as the children
/// of the tree's Document node.
#[derive(Debug, Clone)]
pub struct Fragment {
    tree: DomTree,
    errors: Vec<ParseError>,
}

impl Fragment {
    pub(crate) const fn new(tree: DomTree, errors: Vec<ParseError>) -> Self {
        Self { tree, errors }
    }

    /// The tree holding the fragment nodes.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Take ownership of the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The fragment's top-level nodes, in tree order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        self.tree.children(NodeId::ROOT)
    }

    /// Parse errors in the order they were raised.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The html5lib-format dump of the fragment nodes.
    #[must_use]
    pub fn dump(&self) -> String {
        dump_tree(&self.tree)
    }
}
