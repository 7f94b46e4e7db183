//! Errors raised by structural tree mutation.

use thiserror::Error;

use crate::NodeId;

/// A structural mutation was requested that the tree cannot honour.
///
/// These represent caller bugs, not malformed markup. Markup problems are
/// recovered inside the parser and never surface as a `DomError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not name a node allocated in this tree.
    #[error("node {0:?} does not exist in this tree")]
    NodeNotFound(NodeId),

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// "If child is non-null and its parent is not parent, then throw a
    /// `NotFoundError` `DOMException`."
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The node the caller expected to be the parent.
        parent: NodeId,
        /// The anchor node that is detached from `parent`.
        child: NodeId,
    },

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// "If node is a host-including inclusive ancestor of parent, then throw a
    /// `HierarchyRequestError` `DOMException`."
    #[error("inserting {child:?} into {parent:?} would create a cycle")]
    HierarchyRequest {
        /// The prospective parent.
        parent: NodeId,
        /// The node that is an inclusive ancestor of `parent`.
        child: NodeId,
    },
}
