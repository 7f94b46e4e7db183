//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! and [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).

/// The adoption agency algorithm.
mod adoption;
/// The context element for fragment parsing.
pub mod context;
/// Parser state, dispatcher and token sink.
mod core;
/// html5lib-format tree dump.
pub mod dump;
/// SVG and MathML content.
pub mod foreign_content;
/// The list of active formatting elements.
mod formatting;
/// Creating and inserting nodes.
mod insertion;
/// Insertion mode handlers.
mod modes;
/// DOCTYPE-driven quirks mode.
pub mod quirks;
/// The stack of open elements and its scopes.
mod stack;

pub use self::core::{HTMLParser, InsertionMode, ParseErrorHandler};
pub use context::ContextElement;
pub use dump::dump_tree;
pub use quirks::{is_conforming_doctype, quirks_mode_for_doctype};
